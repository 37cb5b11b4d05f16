//! Time types and day count conventions for financial calculations.
//!
//! This module provides:
//! - `Date`: Type-safe date wrapper around chrono::NaiveDate
//! - `DayCountConvention`: Industry-standard day count conventions
//! - Year fraction calculations for schedule and discounting arithmetic
//!
//! # Examples
//!
//! ```
//! use note_core::types::time::{Date, DayCountConvention};
//!
//! let start = Date::from_ymd(2024, 1, 1).unwrap();
//! let end = Date::from_ymd(2024, 7, 1).unwrap();
//!
//! let yf = DayCountConvention::Act365.year_fraction_dates(start, end);
//! assert!((yf - 0.4986).abs() < 0.001);
//! ```

use chrono::{Datelike, Months, NaiveDate};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use super::error::DateError;

/// Type-safe date wrapper around chrono::NaiveDate.
///
/// Provides ISO 8601 parsing/formatting and the date arithmetic the
/// pricing layers need (day differences for day counts, month offsets
/// for schedule construction).
///
/// # Examples
///
/// ```
/// use note_core::types::time::Date;
///
/// let date = Date::from_ymd(2024, 6, 15).unwrap();
/// assert_eq!(date.year(), 2024);
///
/// let parsed: Date = "2024-06-15".parse().unwrap();
/// assert_eq!(date, parsed);
///
/// let start = Date::from_ymd(2024, 1, 1).unwrap();
/// let end = Date::from_ymd(2024, 1, 11).unwrap();
/// assert_eq!(end - start, 10);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a Date from year, month, and day components.
    ///
    /// # Errors
    ///
    /// Returns `DateError::InvalidDate` when the components do not form a
    /// valid calendar date.
    ///
    /// # Examples
    ///
    /// ```
    /// use note_core::types::time::Date;
    ///
    /// let leap = Date::from_ymd(2024, 2, 29).unwrap();
    /// assert_eq!(leap.day(), 29);
    ///
    /// assert!(Date::from_ymd(2024, 2, 30).is_err());
    /// ```
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Parses a date from an ISO 8601 (YYYY-MM-DD) string.
    pub fn parse(s: &str) -> Result<Self, DateError> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Date)
            .map_err(|e| DateError::ParseError(e.to_string()))
    }

    /// Returns the date shifted forward by a whole number of months.
    ///
    /// End-of-month days clamp to the last valid day of the target month,
    /// matching the usual unadjusted schedule roll.
    ///
    /// # Examples
    ///
    /// ```
    /// use note_core::types::time::Date;
    ///
    /// let d = Date::from_ymd(2024, 1, 31).unwrap();
    /// assert_eq!(d.add_months(1).unwrap(), Date::from_ymd(2024, 2, 29).unwrap());
    /// ```
    pub fn add_months(self, months: u32) -> Result<Self, DateError> {
        self.0
            .checked_add_months(Months::new(months))
            .map(Date)
            .ok_or_else(|| DateError::OutOfRange(format!("{} + {} months", self, months)))
    }

    /// Returns the underlying NaiveDate for access to chrono's full API.
    pub fn into_inner(self) -> NaiveDate {
        self.0
    }

    /// Returns the year component.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    pub fn day(&self) -> u32 {
        self.0.day()
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Date::parse(s)
    }
}

impl Sub for Date {
    type Output = i64;

    /// Number of calendar days from `rhs` to `self`.
    fn sub(self, rhs: Date) -> i64 {
        (self.0 - rhs.0).num_days()
    }
}

/// Industry-standard day count conventions.
///
/// Maps a pair of dates to a year fraction for discounting and schedule
/// arithmetic.
///
/// # Examples
///
/// ```
/// use note_core::types::time::{Date, DayCountConvention};
///
/// let start = Date::from_ymd(2024, 1, 1).unwrap();
/// let end = Date::from_ymd(2025, 1, 1).unwrap();
///
/// let act360 = DayCountConvention::Act360.year_fraction_dates(start, end);
/// assert!((act360 - 366.0 / 360.0).abs() < 1e-12);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DayCountConvention {
    /// Actual/365 Fixed: actual days / 365.0.
    ///
    /// The default for most equity derivatives markets.
    #[default]
    Act365,

    /// Actual/360: actual days / 360.0.
    ///
    /// Money-market convention; the one the reference products quote on.
    Act360,

    /// 30/360 US bond basis.
    ///
    /// Each month is treated as having 30 days and the year as 360 days.
    Thirty360,
}

impl DayCountConvention {
    /// Returns the standard convention name.
    ///
    /// # Examples
    ///
    /// ```
    /// use note_core::types::time::DayCountConvention;
    ///
    /// assert_eq!(DayCountConvention::Act365.name(), "ACT/365");
    /// assert_eq!(DayCountConvention::Act360.name(), "ACT/360");
    /// assert_eq!(DayCountConvention::Thirty360.name(), "30/360");
    /// ```
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Act365 => "ACT/365",
            DayCountConvention::Act360 => "ACT/360",
            DayCountConvention::Thirty360 => "30/360",
        }
    }

    /// Computes the year fraction between two dates.
    ///
    /// Negative when `end` precedes `start`, which callers use to detect
    /// observation dates in the past.
    pub fn year_fraction_dates(&self, start: Date, end: Date) -> f64 {
        match self {
            DayCountConvention::Act365 => (end - start) as f64 / 365.0,
            DayCountConvention::Act360 => (end - start) as f64 / 360.0,
            DayCountConvention::Thirty360 => {
                let d1 = (start.day() as i64).min(30);
                let mut d2 = end.day() as i64;
                if d1 == 30 && d2 == 31 {
                    d2 = 30;
                }
                let days = 360 * (end.year() as i64 - start.year() as i64)
                    + 30 * (end.month() as i64 - start.month() as i64)
                    + (d2 - d1);
                days as f64 / 360.0
            }
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ========================================
    // Date Tests
    // ========================================

    #[test]
    fn test_from_ymd_valid() {
        let date = Date::from_ymd(2024, 6, 15).unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 6);
        assert_eq!(date.day(), 15);
    }

    #[test]
    fn test_from_ymd_invalid() {
        assert!(matches!(
            Date::from_ymd(2023, 2, 29),
            Err(DateError::InvalidDate { .. })
        ));
        assert!(Date::from_ymd(2024, 13, 1).is_err());
        assert!(Date::from_ymd(2024, 0, 1).is_err());
    }

    #[test]
    fn test_parse_and_display_round_trip() {
        let date = Date::parse("2024-07-20").unwrap();
        assert_eq!(date.to_string(), "2024-07-20");
        assert_eq!("2024-07-20".parse::<Date>().unwrap(), date);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Date::parse("not-a-date").is_err());
        assert!(Date::parse("2024/07/20").is_err());
    }

    #[test]
    fn test_date_subtraction() {
        let start = Date::from_ymd(2024, 7, 20).unwrap();
        let end = Date::from_ymd(2025, 1, 20).unwrap();
        assert_eq!(end - start, 184);
        assert_eq!(start - end, -184);
        assert_eq!(start - start, 0);
    }

    #[test]
    fn test_date_ordering() {
        let a = Date::from_ymd(2024, 7, 20).unwrap();
        let b = Date::from_ymd(2025, 1, 20).unwrap();
        assert!(a < b);
        assert!(b >= a);
    }

    #[test]
    fn test_add_months_regular() {
        let d = Date::from_ymd(2024, 7, 20).unwrap();
        assert_eq!(d.add_months(6).unwrap(), Date::from_ymd(2025, 1, 20).unwrap());
        assert_eq!(d.add_months(60).unwrap(), Date::from_ymd(2029, 7, 20).unwrap());
    }

    #[test]
    fn test_add_months_end_of_month_clamps() {
        let d = Date::from_ymd(2024, 8, 31).unwrap();
        assert_eq!(d.add_months(1).unwrap(), Date::from_ymd(2024, 9, 30).unwrap());
    }

    // ========================================
    // DayCountConvention Tests
    // ========================================

    #[test]
    fn test_act365_half_year() {
        let start = Date::from_ymd(2024, 1, 1).unwrap();
        let end = Date::from_ymd(2024, 7, 1).unwrap();
        let yf = DayCountConvention::Act365.year_fraction_dates(start, end);
        assert_relative_eq!(yf, 182.0 / 365.0, epsilon = 1e-12);
    }

    #[test]
    fn test_act360_full_year() {
        let start = Date::from_ymd(2024, 7, 20).unwrap();
        let end = Date::from_ymd(2025, 7, 20).unwrap();
        let yf = DayCountConvention::Act360.year_fraction_dates(start, end);
        assert_relative_eq!(yf, 365.0 / 360.0, epsilon = 1e-12);
    }

    #[test]
    fn test_thirty360_whole_months() {
        let start = Date::from_ymd(2024, 1, 15).unwrap();
        let end = Date::from_ymd(2024, 7, 15).unwrap();
        let yf = DayCountConvention::Thirty360.year_fraction_dates(start, end);
        assert_relative_eq!(yf, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_thirty360_end_of_month_rule() {
        let start = Date::from_ymd(2024, 1, 30).unwrap();
        let end = Date::from_ymd(2024, 3, 31).unwrap();
        // d1 = 30 so d2 = 31 is clamped to 30: exactly two 30-day months.
        let yf = DayCountConvention::Thirty360.year_fraction_dates(start, end);
        assert_relative_eq!(yf, 60.0 / 360.0, epsilon = 1e-12);
    }

    #[test]
    fn test_negative_year_fraction_for_past_dates() {
        let start = Date::from_ymd(2025, 1, 1).unwrap();
        let end = Date::from_ymd(2024, 1, 1).unwrap();
        for dcc in [
            DayCountConvention::Act365,
            DayCountConvention::Act360,
            DayCountConvention::Thirty360,
        ] {
            assert!(dcc.year_fraction_dates(start, end) < 0.0, "{}", dcc);
        }
    }

    #[test]
    fn test_default_convention() {
        assert_eq!(DayCountConvention::default(), DayCountConvention::Act365);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_date() -> impl Strategy<Value = Date> {
            (2000i32..2060, 1u32..=12, 1u32..=28)
                .prop_map(|(y, m, d)| Date::from_ymd(y, m, d).unwrap())
        }

        proptest! {
            /// Actual-day conventions are additive over a middle date.
            #[test]
            fn actual_day_counts_are_additive(a in arb_date(), b in arb_date(), c in arb_date()) {
                let mut dates = [a, b, c];
                dates.sort();
                let [lo, mid, hi] = dates;
                for dcc in [DayCountConvention::Act365, DayCountConvention::Act360] {
                    let whole = dcc.year_fraction_dates(lo, hi);
                    let split = dcc.year_fraction_dates(lo, mid) + dcc.year_fraction_dates(mid, hi);
                    prop_assert!((whole - split).abs() < 1e-12);
                }
            }

            /// Swapping the endpoints flips the sign exactly.
            #[test]
            fn year_fraction_antisymmetric(a in arb_date(), b in arb_date()) {
                for dcc in [
                    DayCountConvention::Act365,
                    DayCountConvention::Act360,
                ] {
                    let fwd = dcc.year_fraction_dates(a, b);
                    let rev = dcc.year_fraction_dates(b, a);
                    prop_assert!((fwd + rev).abs() < 1e-12);
                }
            }
        }
    }
}
