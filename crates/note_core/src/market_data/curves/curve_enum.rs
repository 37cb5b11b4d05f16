//! Static-dispatch wrapper over the concrete curve types.

use super::{FlatCurve, InterpolatedCurve, YieldCurve};
use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Yield curve wrapper for static dispatch.
///
/// Lets environments and processes hold either curve shape by value without
/// trait objects, matching the enum-dispatch style used throughout the
/// workspace.
///
/// # Example
///
/// ```
/// use note_core::market_data::curves::{Curve, YieldCurve};
///
/// let flat = Curve::flat(0.02_f64);
/// let boot = Curve::from_discount_factors(vec![1.0, 2.0], vec![0.98, 0.955]).unwrap();
///
/// assert!(flat.discount_factor(1.0).unwrap() > 0.97);
/// assert!(boot.discount_factor(1.5).unwrap() < 0.98);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Curve<T: Float> {
    /// Constant continuously compounded rate.
    Flat(FlatCurve<T>),
    /// Log-linear interpolation over discount pillars.
    Interpolated(InterpolatedCurve<T>),
}

impl<T: Float> Curve<T> {
    /// Constructs a flat curve from a constant rate.
    pub fn flat(rate: T) -> Self {
        Curve::Flat(FlatCurve::new(rate))
    }

    /// Constructs an interpolated curve from pillar discount factors.
    ///
    /// # Errors
    ///
    /// Propagates [`InterpolatedCurve::new`] validation failures.
    pub fn from_discount_factors(
        times: Vec<T>,
        discount_factors: Vec<T>,
    ) -> Result<Self, MarketDataError> {
        InterpolatedCurve::new(times, discount_factors).map(Curve::Interpolated)
    }
}

impl<T: Float> YieldCurve<T> for Curve<T> {
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError> {
        match self {
            Curve::Flat(c) => c.discount_factor(t),
            Curve::Interpolated(c) => c.discount_factor(t),
        }
    }

    fn zero_rate(&self, t: T) -> Result<T, MarketDataError> {
        match self {
            Curve::Flat(c) => c.zero_rate(t),
            Curve::Interpolated(c) => c.zero_rate(t),
        }
    }

    fn forward_rate(&self, t1: T, t2: T) -> Result<T, MarketDataError> {
        match self {
            Curve::Flat(c) => c.forward_rate(t1, t2),
            Curve::Interpolated(c) => c.forward_rate(t1, t2),
        }
    }
}
