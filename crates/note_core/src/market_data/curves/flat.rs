//! Flat yield curve implementation.

use super::YieldCurve;
use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Flat yield curve with a constant continuously compounded rate.
///
/// The counterpart of a flat-forward term structure: the same rate applies
/// to every maturity. This is the curve shape the reference market setups
/// use for risk-free and dividend discounting.
///
/// # Example
///
/// ```
/// use note_core::market_data::curves::{FlatCurve, YieldCurve};
///
/// let curve = FlatCurve::new(0.02_f64);
/// assert_eq!(curve.zero_rate(1.0).unwrap(), 0.02);
/// assert_eq!(curve.zero_rate(5.0).unwrap(), 0.02);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlatCurve<T: Float> {
    /// The constant continuously compounded rate.
    rate: T,
}

impl<T: Float> FlatCurve<T> {
    /// Constructs a flat curve with the given constant rate.
    ///
    /// Negative rates are valid.
    #[inline]
    pub fn new(rate: T) -> Self {
        Self { rate }
    }

    /// Returns the constant rate.
    #[inline]
    pub fn rate(&self) -> T {
        self.rate
    }
}

impl<T: Float> YieldCurve<T> for FlatCurve<T> {
    /// D(t) = exp(-r * t).
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError> {
        if t < T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        Ok((-self.rate * t).exp())
    }

    fn zero_rate(&self, t: T) -> Result<T, MarketDataError> {
        if t <= T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        Ok(self.rate)
    }

    fn forward_rate(&self, t1: T, t2: T) -> Result<T, MarketDataError> {
        if t1 < T::zero() || t2 <= t1 {
            return Err(MarketDataError::InvalidMaturity {
                t: (t2 - t1).to_f64().unwrap_or(0.0),
            });
        }
        Ok(self.rate)
    }
}
