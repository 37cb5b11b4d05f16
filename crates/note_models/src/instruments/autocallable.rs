//! Autocallable note product definition.
//!
//! An autocallable note observes the underlying on a schedule of coupon
//! dates. At each intermediate observation the note is called early when
//! the underlying clears the autocall barrier, pays its coupon when it
//! clears the coupon barrier, and otherwise (with the memory feature)
//! banks the missed coupon for a later catch-up. At expiry the protection
//! barrier decides between coupon payment, plain principal return, and
//! downside participation through the terminal payoff strategy.
//!
//! Barrier levels are quoted as fractions of the strike; all barrier
//! comparisons downstream are non-strict (`>=`).

use std::collections::BTreeMap;

use note_core::types::Date;

use super::error::InstrumentError;

/// Terminal payoff strategy applied when the note finishes below the
/// protection barrier.
///
/// Evaluated on the absolute underlying level and returning the fraction of
/// notional redeemed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TerminalPayoff {
    /// Linear downside participation: redeem `level / strike` of notional.
    ///
    /// This is the conventional uncapped participation and the default.
    Participation,
    /// Caller-supplied payoff fraction of the absolute underlying level.
    Custom(fn(f64) -> f64),
}

impl TerminalPayoff {
    /// Payoff fraction of notional for a terminal `level`, given the strike.
    #[inline]
    pub fn payoff_fraction(&self, level: f64, strike: f64) -> f64 {
        match self {
            TerminalPayoff::Participation => level / strike,
            TerminalPayoff::Custom(f) => f(level),
        }
    }
}

impl Default for TerminalPayoff {
    fn default() -> Self {
        TerminalPayoff::Participation
    }
}

/// A validated autocallable note.
///
/// Construction goes through [`AutocallableNote::builder`]; an instance of
/// this type always has a strictly increasing coupon schedule, a positive
/// notional, and admissible barriers. The product is read-only throughout
/// a valuation.
///
/// # Examples
///
/// ```
/// use note_core::types::Date;
/// use note_models::instruments::AutocallableNote;
///
/// let dates: Vec<Date> = (1..=10)
///     .map(|i| Date::from_ymd(2024, 7, 20).unwrap().add_months(6 * i).unwrap())
///     .collect();
///
/// let note = AutocallableNote::builder()
///     .coupon_dates(dates)
///     .notional(1_000_000.0)
///     .autocall_barrier(1.0)
///     .coupon_barrier(1.0)
///     .protection_barrier(0.6)
///     .coupon_rate(0.05)
///     .with_memory(true)
///     .build()
///     .unwrap();
///
/// assert!(note.has_memory());
/// assert_eq!(note.coupon_dates().len(), 10);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct AutocallableNote {
    /// Observation/coupon dates, strictly increasing; the last is expiry.
    coupon_dates: Vec<Date>,
    /// Notional in currency units.
    notional: f64,
    /// Autocall barrier as a fraction of strike.
    autocall_barrier: f64,
    /// Coupon barrier as a fraction of strike.
    coupon_barrier: f64,
    /// Capital protection barrier as a fraction of strike.
    protection_barrier: f64,
    /// Periodic coupon rate.
    coupon_rate: f64,
    /// Whether missed coupons accumulate and catch up.
    has_memory: bool,
    /// Realised levels for observation dates at or before valuation.
    past_fixings: BTreeMap<Date, f64>,
    /// Payoff strategy below the protection barrier at expiry.
    terminal_payoff: TerminalPayoff,
}

impl AutocallableNote {
    /// Starts building a note.
    pub fn builder() -> AutocallableNoteBuilder {
        AutocallableNoteBuilder::default()
    }

    /// Observation/coupon dates in increasing order.
    #[inline]
    pub fn coupon_dates(&self) -> &[Date] {
        &self.coupon_dates
    }

    /// First observation date.
    #[inline]
    pub fn first_coupon_date(&self) -> Date {
        self.coupon_dates[0]
    }

    /// Expiration date (the last observation).
    #[inline]
    pub fn expiration_date(&self) -> Date {
        // The builder guarantees a non-empty schedule.
        self.coupon_dates[self.coupon_dates.len() - 1]
    }

    /// Notional in currency units.
    #[inline]
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Autocall barrier as a fraction of strike.
    #[inline]
    pub fn autocall_barrier(&self) -> f64 {
        self.autocall_barrier
    }

    /// Coupon barrier as a fraction of strike.
    #[inline]
    pub fn coupon_barrier(&self) -> f64 {
        self.coupon_barrier
    }

    /// Protection barrier as a fraction of strike.
    #[inline]
    pub fn protection_barrier(&self) -> f64 {
        self.protection_barrier
    }

    /// Periodic coupon rate.
    #[inline]
    pub fn coupon_rate(&self) -> f64 {
        self.coupon_rate
    }

    /// Whether the memory feature is on.
    #[inline]
    pub fn has_memory(&self) -> bool {
        self.has_memory
    }

    /// Memory indicator: 1.0 with memory, 0.0 without.
    ///
    /// Keeps the payoff formula structurally identical in both cases, with
    /// the memory term inert when the feature is off.
    #[inline]
    pub fn memory_indicator(&self) -> f64 {
        if self.has_memory {
            1.0
        } else {
            0.0
        }
    }

    /// Supplied past fixings by date.
    #[inline]
    pub fn past_fixings(&self) -> &BTreeMap<Date, f64> {
        &self.past_fixings
    }

    /// The realised level for a past observation date, if supplied.
    #[inline]
    pub fn fixing(&self, date: Date) -> Option<f64> {
        self.past_fixings.get(&date).copied()
    }

    /// Terminal payoff strategy.
    #[inline]
    pub fn terminal_payoff(&self) -> TerminalPayoff {
        self.terminal_payoff
    }
}

/// Builder for [`AutocallableNote`].
///
/// `coupon_dates`, `notional`, `autocall_barrier`, `coupon_barrier`,
/// `protection_barrier`, and `coupon_rate` are required; memory defaults to
/// off, past fixings to empty, and the terminal payoff to linear
/// participation.
#[derive(Clone, Debug, Default)]
pub struct AutocallableNoteBuilder {
    coupon_dates: Option<Vec<Date>>,
    notional: Option<f64>,
    autocall_barrier: Option<f64>,
    coupon_barrier: Option<f64>,
    protection_barrier: Option<f64>,
    coupon_rate: Option<f64>,
    has_memory: bool,
    past_fixings: BTreeMap<Date, f64>,
    terminal_payoff: TerminalPayoff,
}

impl AutocallableNoteBuilder {
    /// Sets the observation/coupon schedule.
    pub fn coupon_dates(mut self, dates: Vec<Date>) -> Self {
        self.coupon_dates = Some(dates);
        self
    }

    /// Sets the notional.
    pub fn notional(mut self, notional: f64) -> Self {
        self.notional = Some(notional);
        self
    }

    /// Sets the autocall barrier (fraction of strike).
    pub fn autocall_barrier(mut self, barrier: f64) -> Self {
        self.autocall_barrier = Some(barrier);
        self
    }

    /// Sets the coupon barrier (fraction of strike).
    pub fn coupon_barrier(mut self, barrier: f64) -> Self {
        self.coupon_barrier = Some(barrier);
        self
    }

    /// Sets the protection barrier (fraction of strike).
    pub fn protection_barrier(mut self, barrier: f64) -> Self {
        self.protection_barrier = Some(barrier);
        self
    }

    /// Sets the periodic coupon rate.
    pub fn coupon_rate(mut self, rate: f64) -> Self {
        self.coupon_rate = Some(rate);
        self
    }

    /// Enables or disables the memory feature.
    pub fn with_memory(mut self, has_memory: bool) -> Self {
        self.has_memory = has_memory;
        self
    }

    /// Records a realised level for an observation date.
    pub fn past_fixing(mut self, date: Date, level: f64) -> Self {
        self.past_fixings.insert(date, level);
        self
    }

    /// Replaces the whole past-fixing map.
    pub fn past_fixings(mut self, fixings: BTreeMap<Date, f64>) -> Self {
        self.past_fixings = fixings;
        self
    }

    /// Sets the terminal payoff strategy.
    pub fn terminal_payoff(mut self, payoff: TerminalPayoff) -> Self {
        self.terminal_payoff = payoff;
        self
    }

    /// Validates and builds the note.
    ///
    /// # Errors
    ///
    /// `InstrumentError` when a required field is missing, the schedule is
    /// empty or not strictly increasing, the notional or a barrier is out of
    /// range, or a past fixing level is not a positive finite number.
    pub fn build(self) -> Result<AutocallableNote, InstrumentError> {
        let coupon_dates = self
            .coupon_dates
            .ok_or(InstrumentError::MissingField {
                name: "coupon_dates",
            })?;
        let notional = self.notional.ok_or(InstrumentError::MissingField {
            name: "notional",
        })?;
        let autocall_barrier = self
            .autocall_barrier
            .ok_or(InstrumentError::MissingField {
                name: "autocall_barrier",
            })?;
        let coupon_barrier = self.coupon_barrier.ok_or(InstrumentError::MissingField {
            name: "coupon_barrier",
        })?;
        let protection_barrier =
            self.protection_barrier
                .ok_or(InstrumentError::MissingField {
                    name: "protection_barrier",
                })?;
        let coupon_rate = self.coupon_rate.ok_or(InstrumentError::MissingField {
            name: "coupon_rate",
        })?;

        if coupon_dates.is_empty() {
            return Err(InstrumentError::EmptySchedule);
        }
        for (index, pair) in coupon_dates.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(InstrumentError::UnsortedSchedule { index: index + 1 });
            }
        }

        if !(notional.is_finite() && notional > 0.0) {
            return Err(InstrumentError::InvalidNotional(notional));
        }
        if !(autocall_barrier.is_finite() && autocall_barrier > 0.0) {
            return Err(InstrumentError::InvalidBarrier {
                name: "autocall",
                value: autocall_barrier,
            });
        }
        if !(coupon_barrier.is_finite() && coupon_barrier > 0.0) {
            return Err(InstrumentError::InvalidBarrier {
                name: "coupon",
                value: coupon_barrier,
            });
        }
        if !(protection_barrier.is_finite() && protection_barrier >= 0.0) {
            return Err(InstrumentError::InvalidBarrier {
                name: "protection",
                value: protection_barrier,
            });
        }
        if !(coupon_rate.is_finite() && coupon_rate >= 0.0) {
            return Err(InstrumentError::InvalidCouponRate(coupon_rate));
        }
        for (&date, &level) in &self.past_fixings {
            if !(level.is_finite() && level > 0.0) {
                return Err(InstrumentError::InvalidFixing { date, level });
            }
        }

        Ok(AutocallableNote {
            coupon_dates,
            notional,
            autocall_barrier,
            coupon_barrier,
            protection_barrier,
            coupon_rate,
            has_memory: self.has_memory,
            past_fixings: self.past_fixings,
            terminal_payoff: self.terminal_payoff,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn semiannual_dates(count: u32) -> Vec<Date> {
        let start = Date::from_ymd(2024, 7, 20).unwrap();
        (1..=count).map(|i| start.add_months(6 * i).unwrap()).collect()
    }

    fn sample_builder() -> AutocallableNoteBuilder {
        AutocallableNote::builder()
            .coupon_dates(semiannual_dates(10))
            .notional(1_000_000.0)
            .autocall_barrier(1.0)
            .coupon_barrier(1.0)
            .protection_barrier(0.6)
            .coupon_rate(0.05)
    }

    #[test]
    fn test_build_valid_note() {
        let note = sample_builder().with_memory(true).build().unwrap();
        assert_eq!(note.coupon_dates().len(), 10);
        assert_eq!(note.notional(), 1_000_000.0);
        assert_eq!(note.memory_indicator(), 1.0);
        assert_eq!(
            note.expiration_date(),
            Date::from_ymd(2029, 7, 20).unwrap()
        );
        assert_eq!(
            note.first_coupon_date(),
            Date::from_ymd(2025, 1, 20).unwrap()
        );
    }

    #[test]
    fn test_memory_defaults_off() {
        let note = sample_builder().build().unwrap();
        assert!(!note.has_memory());
        assert_eq!(note.memory_indicator(), 0.0);
    }

    #[test]
    fn test_missing_required_fields() {
        let result = AutocallableNote::builder().build();
        assert!(matches!(
            result,
            Err(InstrumentError::MissingField {
                name: "coupon_dates"
            })
        ));

        let result = AutocallableNote::builder()
            .coupon_dates(semiannual_dates(2))
            .build();
        assert!(matches!(
            result,
            Err(InstrumentError::MissingField { name: "notional" })
        ));
    }

    #[test]
    fn test_empty_schedule_rejected() {
        let result = sample_builder().coupon_dates(vec![]).build();
        assert!(matches!(result, Err(InstrumentError::EmptySchedule)));
    }

    #[test]
    fn test_unsorted_schedule_rejected() {
        let mut dates = semiannual_dates(4);
        dates.swap(1, 2);
        let result = sample_builder().coupon_dates(dates).build();
        assert!(matches!(
            result,
            Err(InstrumentError::UnsortedSchedule { index: 1 })
        ));

        // Duplicate dates are also not strictly increasing.
        let mut dates = semiannual_dates(3);
        dates[1] = dates[2];
        assert!(sample_builder().coupon_dates(dates).build().is_err());
    }

    #[test]
    fn test_invalid_notional_rejected() {
        for notional in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = sample_builder().notional(notional).build();
            assert!(matches!(result, Err(InstrumentError::InvalidNotional(_))));
        }
    }

    #[test]
    fn test_invalid_barriers_rejected() {
        assert!(sample_builder().autocall_barrier(0.0).build().is_err());
        assert!(sample_builder().coupon_barrier(-0.5).build().is_err());
        assert!(sample_builder().protection_barrier(-0.1).build().is_err());
        // Zero protection (fully protected principal) is allowed.
        assert!(sample_builder().protection_barrier(0.0).build().is_ok());
    }

    #[test]
    fn test_invalid_coupon_rate_rejected() {
        assert!(sample_builder().coupon_rate(-0.05).build().is_err());
        assert!(sample_builder().coupon_rate(f64::NAN).build().is_err());
        assert!(sample_builder().coupon_rate(0.0).build().is_ok());
    }

    #[test]
    fn test_past_fixings() {
        let date = Date::from_ymd(2025, 1, 20).unwrap();
        let note = sample_builder().past_fixing(date, 75.5).build().unwrap();
        assert_eq!(note.fixing(date), Some(75.5));
        assert_eq!(note.fixing(Date::from_ymd(2026, 1, 20).unwrap()), None);

        let result = sample_builder().past_fixing(date, -1.0).build();
        assert!(matches!(result, Err(InstrumentError::InvalidFixing { .. })));
    }

    #[test]
    fn test_terminal_payoff_participation() {
        let payoff = TerminalPayoff::Participation;
        assert_eq!(payoff.payoff_fraction(40.0, 80.0), 0.5);
    }

    #[test]
    fn test_terminal_payoff_custom() {
        fn floored(level: f64) -> f64 {
            (level / 80.0).max(0.25)
        }
        let payoff = TerminalPayoff::Custom(floored);
        assert_eq!(payoff.payoff_fraction(8.0, 80.0), 0.25);
        assert_eq!(payoff.payoff_fraction(60.0, 80.0), 0.75);
    }
}
