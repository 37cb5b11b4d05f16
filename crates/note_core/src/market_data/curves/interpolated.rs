//! Interpolated discount curve implementation.

use super::YieldCurve;
use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Discount curve defined by pillar maturities and discount factors.
///
/// Interpolation is log-linear in the discount factor, which keeps forward
/// rates piecewise constant between pillars. Queries before the first
/// pillar interpolate from D(0) = 1; queries beyond the last pillar
/// extrapolate flat in the last pillar's zero rate.
///
/// # Example
///
/// ```
/// use note_core::market_data::curves::{InterpolatedCurve, YieldCurve};
///
/// let curve = InterpolatedCurve::new(
///     vec![1.0, 2.0, 5.0],
///     vec![0.98, 0.955, 0.88],
/// ).unwrap();
///
/// assert!((curve.discount_factor(1.0).unwrap() - 0.98).abs() < 1e-12);
/// let mid = curve.discount_factor(1.5).unwrap();
/// assert!(mid < 0.98 && mid > 0.955);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterpolatedCurve<T: Float> {
    /// Pillar maturities in years, positive and strictly increasing.
    times: Vec<T>,
    /// Log discount factors at the pillars.
    log_dfs: Vec<T>,
}

impl<T: Float> InterpolatedCurve<T> {
    /// Constructs a curve from pillar maturities and discount factors.
    ///
    /// # Errors
    ///
    /// - `MarketDataError::EmptyCurve` when no pillars are supplied
    /// - `MarketDataError::UnsortedPillars` when times are not positive and
    ///   strictly increasing, or the lengths differ
    /// - `MarketDataError::InvalidDiscountFactor` when a factor is outside
    ///   (0, 1] or factors increase with maturity
    pub fn new(times: Vec<T>, discount_factors: Vec<T>) -> Result<Self, MarketDataError> {
        if times.is_empty() {
            return Err(MarketDataError::EmptyCurve);
        }
        if times.len() != discount_factors.len() {
            return Err(MarketDataError::UnsortedPillars {
                index: times.len().min(discount_factors.len()),
            });
        }

        let mut prev_t = T::zero();
        let mut prev_df = T::one();
        for (i, (&t, &df)) in times.iter().zip(discount_factors.iter()).enumerate() {
            if t <= prev_t {
                return Err(MarketDataError::UnsortedPillars { index: i });
            }
            if df <= T::zero() || df > prev_df {
                return Err(MarketDataError::InvalidDiscountFactor {
                    df: df.to_f64().unwrap_or(f64::NAN),
                    index: i,
                });
            }
            prev_t = t;
            prev_df = df;
        }

        let log_dfs = discount_factors.iter().map(|df| df.ln()).collect();
        Ok(Self { times, log_dfs })
    }

    /// Returns the number of pillars.
    #[inline]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Returns true when the curve has no pillars (never, post-construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Log discount factor at `t >= 0`, with interpolation rules applied.
    fn log_df(&self, t: T) -> T {
        let n = self.times.len();
        if t <= T::zero() {
            return T::zero();
        }
        // Short end: log-linear between (0, 0) and the first pillar.
        if t <= self.times[0] {
            return self.log_dfs[0] * (t / self.times[0]);
        }
        // Long end: flat extrapolation of the last pillar's zero rate.
        if t >= self.times[n - 1] {
            return self.log_dfs[n - 1] * (t / self.times[n - 1]);
        }
        // Interior: log-linear between bracketing pillars.
        let mut hi = 1;
        while self.times[hi] < t {
            hi += 1;
        }
        let lo = hi - 1;
        let w = (t - self.times[lo]) / (self.times[hi] - self.times[lo]);
        self.log_dfs[lo] + w * (self.log_dfs[hi] - self.log_dfs[lo])
    }
}

impl<T: Float> YieldCurve<T> for InterpolatedCurve<T> {
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError> {
        if t < T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        Ok(self.log_df(t).exp())
    }

    fn zero_rate(&self, t: T) -> Result<T, MarketDataError> {
        if t <= T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        Ok(-self.log_df(t) / t)
    }
}
