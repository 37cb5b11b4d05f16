//! Black-Scholes pricing for European options with continuous dividends.
//!
//! ## Formulas
//!
//! With continuous dividend yield q:
//!
//! **Call**: C = S e^(-qT) N(d1) - K e^(-rT) N(d2)
//! **Put**:  P = K e^(-rT) N(-d2) - S e^(-qT) N(-d1)
//!
//! where d1 = (ln(S/K) + (r - q + sigma^2/2) T) / (sigma sqrt(T)) and
//! d2 = d1 - sigma sqrt(T).

use super::distributions::norm_cdf;
use super::error::AnalyticalError;

/// Black-Scholes model for European option pricing.
///
/// Calibration uses this in two directions: quoted implied volatilities are
/// turned into target prices for the least-squares constraints, and model
/// prices are turned back into volatilities by [`implied_volatility`].
///
/// # Examples
///
/// ```
/// use note_models::analytical::BlackScholes;
///
/// let bs = BlackScholes::new(100.0, 0.05, 0.0, 0.2).unwrap();
/// let call = bs.price_call(100.0, 1.0).unwrap();
/// let put = bs.price_put(100.0, 1.0).unwrap();
///
/// // Put-call parity: C - P = S e^(-qT) - K e^(-rT)
/// let parity = call - put - (100.0 - 100.0 * (-0.05_f64).exp());
/// assert!(parity.abs() < 1e-7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackScholes {
    /// Spot price.
    spot: f64,
    /// Risk-free rate (continuously compounded).
    rate: f64,
    /// Dividend yield (continuously compounded).
    dividend: f64,
    /// Volatility.
    volatility: f64,
}

impl BlackScholes {
    /// Creates a Black-Scholes model.
    ///
    /// # Errors
    ///
    /// - `AnalyticalError::InvalidSpot` if spot <= 0 or non-finite
    /// - `AnalyticalError::InvalidVolatility` if volatility <= 0 or non-finite
    pub fn new(spot: f64, rate: f64, dividend: f64, volatility: f64) -> Result<Self, AnalyticalError> {
        if !(spot.is_finite() && spot > 0.0) {
            return Err(AnalyticalError::InvalidSpot { spot });
        }
        if !(volatility.is_finite() && volatility > 0.0) {
            return Err(AnalyticalError::InvalidVolatility { volatility });
        }
        Ok(Self {
            spot,
            rate,
            dividend,
            volatility,
        })
    }

    /// Returns the spot price.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Returns the volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// The d1 term for a given strike and expiry.
    fn d1(&self, strike: f64, expiry: f64) -> f64 {
        let vol_sqrt_t = self.volatility * expiry.sqrt();
        ((self.spot / strike).ln()
            + (self.rate - self.dividend + 0.5 * self.volatility * self.volatility) * expiry)
            / vol_sqrt_t
    }

    fn validate_quote(&self, strike: f64, expiry: f64) -> Result<(), AnalyticalError> {
        if !(strike.is_finite() && strike > 0.0) {
            return Err(AnalyticalError::InvalidStrike { strike });
        }
        if !(expiry.is_finite() && expiry > 0.0) {
            return Err(AnalyticalError::InvalidExpiry { expiry });
        }
        Ok(())
    }

    /// European call price.
    ///
    /// # Errors
    ///
    /// Invalid strike or expiry.
    pub fn price_call(&self, strike: f64, expiry: f64) -> Result<f64, AnalyticalError> {
        self.validate_quote(strike, expiry)?;
        let d1 = self.d1(strike, expiry);
        let d2 = d1 - self.volatility * expiry.sqrt();
        let df_q = (-self.dividend * expiry).exp();
        let df_r = (-self.rate * expiry).exp();
        Ok(self.spot * df_q * norm_cdf(d1) - strike * df_r * norm_cdf(d2))
    }

    /// European put price.
    ///
    /// # Errors
    ///
    /// Invalid strike or expiry.
    pub fn price_put(&self, strike: f64, expiry: f64) -> Result<f64, AnalyticalError> {
        self.validate_quote(strike, expiry)?;
        let d1 = self.d1(strike, expiry);
        let d2 = d1 - self.volatility * expiry.sqrt();
        let df_q = (-self.dividend * expiry).exp();
        let df_r = (-self.rate * expiry).exp();
        Ok(strike * df_r * norm_cdf(-d2) - self.spot * df_q * norm_cdf(-d1))
    }
}

/// Minimum volatility bracketed by the implied-volatility search.
const IV_LOWER: f64 = 1e-6;
/// Maximum volatility bracketed by the implied-volatility search.
const IV_UPPER: f64 = 5.0;
/// Bisection iterations (gives ~1e-15 bracket width from [1e-6, 5]).
const IV_MAX_ITER: usize = 128;

/// Black-Scholes implied volatility of a European call price.
///
/// Inverts the call price by bisection, which is slower than a Newton
/// iteration but unconditionally convergent across the whole surface.
///
/// # Errors
///
/// - `AnalyticalError::NoSolution` when the price violates the static
///   no-arbitrage bounds `max(S e^(-qT) - K e^(-rT), 0) < P < S e^(-qT)`
///   or lies outside the bracketed volatility range
/// - Argument validation errors as for [`BlackScholes`]
///
/// # Examples
///
/// ```
/// use note_models::analytical::{implied_volatility, BlackScholes};
///
/// let bs = BlackScholes::new(100.0, 0.02, 0.01, 0.35).unwrap();
/// let price = bs.price_call(110.0, 2.0).unwrap();
/// let vol = implied_volatility(price, 100.0, 110.0, 2.0, 0.02, 0.01).unwrap();
/// assert!((vol - 0.35).abs() < 1e-6);
/// ```
pub fn implied_volatility(
    price: f64,
    spot: f64,
    strike: f64,
    expiry: f64,
    rate: f64,
    dividend: f64,
) -> Result<f64, AnalyticalError> {
    if !(spot.is_finite() && spot > 0.0) {
        return Err(AnalyticalError::InvalidSpot { spot });
    }
    if !(strike.is_finite() && strike > 0.0) {
        return Err(AnalyticalError::InvalidStrike { strike });
    }
    if !(expiry.is_finite() && expiry > 0.0) {
        return Err(AnalyticalError::InvalidExpiry { expiry });
    }

    let forward_leg = spot * (-dividend * expiry).exp();
    let strike_leg = strike * (-rate * expiry).exp();
    let intrinsic = (forward_leg - strike_leg).max(0.0);
    if !price.is_finite() || price <= intrinsic || price >= forward_leg {
        return Err(AnalyticalError::NoSolution(format!(
            "price {} outside arbitrage bounds ({}, {})",
            price, intrinsic, forward_leg
        )));
    }

    let price_at = |vol: f64| -> Result<f64, AnalyticalError> {
        BlackScholes::new(spot, rate, dividend, vol)?.price_call(strike, expiry)
    };

    let mut lo = IV_LOWER;
    let mut hi = IV_UPPER;
    if price_at(lo)? > price || price_at(hi)? < price {
        return Err(AnalyticalError::NoSolution(format!(
            "price {} not bracketed by vols [{}, {}]",
            price, IV_LOWER, IV_UPPER
        )));
    }

    for _ in 0..IV_MAX_ITER {
        let mid = 0.5 * (lo + hi);
        if price_at(mid)? < price {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    Ok(0.5 * (lo + hi))
}
