//! The market environment threaded through every pricing call.

use crate::market_data::curves::{Curve, YieldCurve};
use crate::market_data::error::MarketDataError;
use crate::types::time::{Date, DayCountConvention};

/// Immutable market context for a single pricing or calibration run.
///
/// Carries the valuation date, spot level, risk-free and dividend discount
/// curves, and the day count convention that maps dates onto curve times.
/// There is no process-wide evaluation date anywhere in the workspace; the
/// environment is passed explicitly into every call that needs one.
///
/// # Example
///
/// ```
/// use note_core::market_data::curves::Curve;
/// use note_core::market_data::MarketEnvironment;
/// use note_core::types::{Date, DayCountConvention};
///
/// let env = MarketEnvironment::new(
///     Date::from_ymd(2024, 7, 20).unwrap(),
///     79.98,
///     Curve::flat(0.02),
///     Curve::flat(0.028),
///     DayCountConvention::Act360,
/// ).unwrap();
///
/// let in_one_year = Date::from_ymd(2025, 7, 20).unwrap();
/// let df = env.discount(in_one_year).unwrap();
/// assert!(df < 1.0 && df > 0.97);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MarketEnvironment {
    /// Valuation date (time origin of the run).
    valuation_date: Date,
    /// Spot level of the underlying.
    spot: f64,
    /// Risk-free discounting curve.
    risk_free: Curve<f64>,
    /// Dividend yield curve.
    dividend: Curve<f64>,
    /// Day count convention mapping dates to year fractions.
    day_count: DayCountConvention,
}

impl MarketEnvironment {
    /// Constructs a market environment.
    ///
    /// # Errors
    ///
    /// `MarketDataError::InvalidSpot` when the spot level is not a positive
    /// finite number.
    pub fn new(
        valuation_date: Date,
        spot: f64,
        risk_free: Curve<f64>,
        dividend: Curve<f64>,
        day_count: DayCountConvention,
    ) -> Result<Self, MarketDataError> {
        if !(spot.is_finite() && spot > 0.0) {
            return Err(MarketDataError::InvalidSpot { spot });
        }
        Ok(Self {
            valuation_date,
            spot,
            risk_free,
            dividend,
            day_count,
        })
    }

    /// Returns the valuation date.
    #[inline]
    pub fn valuation_date(&self) -> Date {
        self.valuation_date
    }

    /// Returns the spot level.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Returns the risk-free curve.
    #[inline]
    pub fn risk_free(&self) -> &Curve<f64> {
        &self.risk_free
    }

    /// Returns the dividend curve.
    #[inline]
    pub fn dividend(&self) -> &Curve<f64> {
        &self.dividend
    }

    /// Returns the day count convention.
    #[inline]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Year fraction from the valuation date to `date`.
    ///
    /// Negative for dates before the valuation date.
    #[inline]
    pub fn year_fraction(&self, date: Date) -> f64 {
        self.day_count.year_fraction_dates(self.valuation_date, date)
    }

    /// Risk-free discount factor for a date on or after the valuation date.
    ///
    /// # Errors
    ///
    /// `MarketDataError::InvalidMaturity` for dates before valuation.
    pub fn discount(&self, date: Date) -> Result<f64, MarketDataError> {
        self.risk_free.discount_factor(self.year_fraction(date))
    }

    /// Dividend discount factor for a date on or after the valuation date.
    ///
    /// # Errors
    ///
    /// `MarketDataError::InvalidMaturity` for dates before valuation.
    pub fn dividend_discount(&self, date: Date) -> Result<f64, MarketDataError> {
        self.dividend.discount_factor(self.year_fraction(date))
    }
}
