//! Yield curve trait definition.

use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Generic yield curve trait for discount factor and rate calculations.
///
/// Implementations are generic over `T: Float` so the same curve code can
/// serve `f64` production paths and any future generic numeric type.
///
/// # Contract
///
/// - `discount_factor(t)` returns the discount factor D(t) for maturity t
/// - `zero_rate(t)` returns the continuously compounded zero rate r(t)
/// - `forward_rate(t1, t2)` returns the forward rate between t1 and t2
///
/// # Invariants
///
/// - D(0) = 1
/// - D(t) > 0 for all t >= 0
/// - D(t1) >= D(t2) for t1 <= t2 under non-negative rates
///
/// # Example
///
/// ```
/// use note_core::market_data::curves::{FlatCurve, YieldCurve};
///
/// let curve = FlatCurve::new(0.05_f64);
/// let df = curve.discount_factor(1.0).unwrap();
/// assert!((df - (-0.05_f64).exp()).abs() < 1e-12);
/// ```
pub trait YieldCurve<T: Float> {
    /// Returns the discount factor for maturity `t` (in years).
    ///
    /// # Errors
    ///
    /// `MarketDataError::InvalidMaturity` when `t < 0`.
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError>;

    /// Returns the continuously compounded zero rate for maturity `t`.
    ///
    /// # Errors
    ///
    /// `MarketDataError::InvalidMaturity` when `t <= 0`.
    fn zero_rate(&self, t: T) -> Result<T, MarketDataError>;

    /// Returns the continuously compounded forward rate between `t1` and `t2`.
    ///
    /// # Errors
    ///
    /// `MarketDataError::InvalidMaturity` when `t1 < 0` or `t2 <= t1`.
    fn forward_rate(&self, t1: T, t2: T) -> Result<T, MarketDataError> {
        if t1 < T::zero() || t2 <= t1 {
            return Err(MarketDataError::InvalidMaturity {
                t: (t2 - t1).to_f64().unwrap_or(0.0),
            });
        }
        let df1 = self.discount_factor(t1)?;
        let df2 = self.discount_factor(t2)?;
        Ok((df1 / df2).ln() / (t2 - t1))
    }
}
