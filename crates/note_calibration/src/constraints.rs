//! Pricing constraints: one least-squares residual per surface quote.

use note_core::market_data::curves::YieldCurve;
use note_core::market_data::MarketEnvironment;
use note_core::types::Date;
use note_models::analytical::{heston_call_price, BlackScholes};
use note_models::models::heston::HestonProcess;

use crate::error::CalibrationError;

/// A single calibration constraint for one (expiry, strike, vol) quote.
///
/// At construction the quoted implied volatility is converted into a
/// Black-Scholes target price using the zero rates the environment implies
/// at that expiry; during optimisation the constraint compares the
/// model-implied Heston call price against that frozen target. The
/// residual is the relative price error `(model - market) / market`.
#[derive(Clone, Debug, PartialEq)]
pub struct OptionConstraint {
    /// Time to expiry in years.
    expiry: f64,
    /// Absolute strike.
    strike: f64,
    /// Continuously compounded risk-free zero rate to expiry.
    rate: f64,
    /// Continuously compounded dividend zero rate to expiry.
    dividend: f64,
    /// The quoted implied volatility.
    market_vol: f64,
    /// The Black-Scholes price of the quote, the least-squares target.
    market_price: f64,
}

impl OptionConstraint {
    /// Builds a constraint from one surface quote.
    ///
    /// # Errors
    ///
    /// - `CalibrationError::ExpiredQuote` when the expiry is not strictly
    ///   after the environment's valuation date
    /// - Analytical and curve errors from target-price construction
    pub fn from_quote(
        env: &MarketEnvironment,
        expiry_date: Date,
        strike: f64,
        market_vol: f64,
    ) -> Result<Self, CalibrationError> {
        let expiry = env.year_fraction(expiry_date);
        if expiry <= 0.0 {
            return Err(CalibrationError::ExpiredQuote(expiry_date));
        }
        let rate = env.risk_free().zero_rate(expiry)?;
        let dividend = env.dividend().zero_rate(expiry)?;
        let market_price =
            BlackScholes::new(env.spot(), rate, dividend, market_vol)?.price_call(strike, expiry)?;

        Ok(Self {
            expiry,
            strike,
            rate,
            dividend,
            market_vol,
            market_price,
        })
    }

    /// Time to expiry in years.
    #[inline]
    pub fn expiry(&self) -> f64 {
        self.expiry
    }

    /// Absolute strike.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// The quoted implied volatility.
    #[inline]
    pub fn market_vol(&self) -> f64 {
        self.market_vol
    }

    /// The frozen Black-Scholes target price.
    #[inline]
    pub fn market_price(&self) -> f64 {
        self.market_price
    }

    /// Relative price error of a parameter snapshot against this quote.
    ///
    /// Pure read of the snapshot: safe to evaluate concurrently with every
    /// other constraint for the same candidate vector.
    ///
    /// # Errors
    ///
    /// Propagates a non-finite model price from the quadrature.
    pub fn calibration_error(&self, snapshot: &HestonProcess) -> Result<f64, CalibrationError> {
        let model = heston_call_price(
            snapshot.spot(),
            self.strike,
            self.expiry,
            self.rate,
            self.dividend,
            snapshot.params(),
        )?;
        Ok((model - self.market_price) / self.market_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use note_core::market_data::curves::Curve;
    use note_core::types::DayCountConvention;
    use note_models::analytical::implied_volatility;
    use note_models::models::heston::HestonParams;

    fn sample_env() -> MarketEnvironment {
        MarketEnvironment::new(
            Date::from_ymd(2024, 7, 20).unwrap(),
            79.98,
            Curve::flat(0.02),
            Curve::flat(0.028),
            DayCountConvention::Act365,
        )
        .unwrap()
    }

    fn sample_process(env: &MarketEnvironment, params: HestonParams) -> HestonProcess {
        HestonProcess::new(
            env.spot(),
            params,
            env.risk_free().clone(),
            env.dividend().clone(),
        )
        .unwrap()
    }

    #[test]
    fn test_expired_quote_rejected() {
        let env = sample_env();
        let result =
            OptionConstraint::from_quote(&env, Date::from_ymd(2024, 1, 20).unwrap(), 80.0, 0.35);
        assert!(matches!(result, Err(CalibrationError::ExpiredQuote(_))));

        let result = OptionConstraint::from_quote(&env, env.valuation_date(), 80.0, 0.35);
        assert!(matches!(result, Err(CalibrationError::ExpiredQuote(_))));
    }

    #[test]
    fn test_target_price_matches_black_scholes() {
        let env = sample_env();
        let expiry_date = Date::from_ymd(2025, 7, 20).unwrap();
        let constraint = OptionConstraint::from_quote(&env, expiry_date, 80.0, 0.3565).unwrap();

        let t = env.year_fraction(expiry_date);
        let bs = BlackScholes::new(79.98, 0.02, 0.028, 0.3565).unwrap();
        assert_abs_diff_eq!(
            constraint.market_price(),
            bs.price_call(80.0, t).unwrap(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_zero_residual_when_model_matches_market() {
        // Quote the market at exactly the model's own implied vol: the
        // residual at those parameters must vanish.
        let env = sample_env();
        let params = HestonParams::new(0.04, 1.5, 0.05, 0.3, -0.6).unwrap();
        let expiry_date = Date::from_ymd(2026, 7, 20).unwrap();
        let t = env.year_fraction(expiry_date);

        let model_price = heston_call_price(79.98, 88.0, t, 0.02, 0.028, &params).unwrap();
        let model_vol = implied_volatility(model_price, 79.98, 88.0, t, 0.02, 0.028).unwrap();

        let constraint = OptionConstraint::from_quote(&env, expiry_date, 88.0, model_vol).unwrap();
        let residual = constraint
            .calibration_error(&sample_process(&env, params))
            .unwrap();
        assert_abs_diff_eq!(residual, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_residual_sign_tracks_model_vol() {
        // A model quoted above the market vol must price above the target.
        let env = sample_env();
        let expiry_date = Date::from_ymd(2025, 7, 20).unwrap();
        let constraint = OptionConstraint::from_quote(&env, expiry_date, 80.0, 0.10).unwrap();

        let rich_params = HestonParams::new(0.16, 1.0, 0.16, 0.2, -0.3).unwrap();
        let residual = constraint
            .calibration_error(&sample_process(&env, rich_params))
            .unwrap();
        assert!(residual > 0.0);
    }
}
