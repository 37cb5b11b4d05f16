//! The autocallable payoff state machine.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use note_core::market_data::MarketEnvironment;
use note_models::instruments::AutocallableNote;

use super::error::AutocallError;
use crate::mc::PathBatch;

/// Per-path transient state, created fresh for each row and discarded
/// after its contribution is accumulated.
struct PathState {
    /// Coupons missed since the last barrier clear (memory feature).
    unpaid_coupons: u32,
    /// Terminal once the autocall barrier is breached.
    called: bool,
    /// Accumulated discounted present value.
    pv: f64,
}

impl PathState {
    fn new() -> Self {
        Self {
            unpaid_coupons: 0,
            called: false,
            pv: 0.0,
        }
    }
}

/// Walks simulated paths through the autocall, coupon-with-memory, and
/// capital-protection rules and aggregates a discounted Monte Carlo PV.
///
/// Barrier comparisons are non-strict (`>=`) and checked in a fixed,
/// significant order: autocall before coupon before shortfall. A level
/// exactly on a barrier therefore counts as a breach in the direction
/// favourable to early termination or coupon payment.
#[derive(Debug, Clone)]
pub struct AutocallPayoffEngine {
    env: MarketEnvironment,
}

impl AutocallPayoffEngine {
    /// Creates an engine for one market environment.
    pub fn new(env: MarketEnvironment) -> Self {
        Self { env }
    }

    /// Returns the engine's environment.
    pub fn environment(&self) -> &MarketEnvironment {
        &self.env
    }

    /// Pre-pricing short-circuits, checked before any path is needed.
    ///
    /// Returns `Some(0.0)` when the note has matured (valuation on or
    /// after the final coupon date) or has already autocalled (a past
    /// fixing on or above the autocall barrier once the schedule has
    /// started).
    ///
    /// # Errors
    ///
    /// - `AutocallError::InvalidStrike` for a non-positive strike
    /// - `AutocallError::MissingFixing` when an observation date at or
    ///   before valuation has no supplied fixing
    pub fn short_circuit(
        &self,
        note: &AutocallableNote,
        strike: f64,
    ) -> Result<Option<f64>, AutocallError> {
        if !(strike.is_finite() && strike > 0.0) {
            return Err(AutocallError::InvalidStrike(strike));
        }

        let valuation = self.env.valuation_date();
        if valuation >= note.expiration_date() {
            return Ok(Some(0.0));
        }

        let past_levels = resolve_past_fixings(note, &self.env)?;
        if past_levels
            .iter()
            .any(|&level| level >= note.autocall_barrier() * strike)
        {
            return Ok(Some(0.0));
        }

        Ok(None)
    }

    /// Monte Carlo present value of the note over a simulated batch.
    ///
    /// Batch columns map onto the note's observation dates strictly after
    /// the valuation date, with column 0 holding the (ignored) time-zero
    /// level. Past observation dates are folded in from the note's
    /// fixings ahead of the simulated columns; their payoffs are already
    /// settled and only their barrier bookkeeping carries forward.
    ///
    /// # Errors
    ///
    /// - Short-circuit errors (invalid strike, missing fixing)
    /// - `AutocallError::BatchShape` when the batch width does not match
    ///   the future schedule
    /// - `AutocallError::NonFinite` when a path contribution is NaN or
    ///   infinite
    pub fn price(
        &self,
        note: &AutocallableNote,
        batch: &PathBatch,
        strike: f64,
    ) -> Result<f64, AutocallError> {
        if let Some(settled) = self.short_circuit(note, strike)? {
            return Ok(settled);
        }

        let valuation = self.env.valuation_date();
        let past_levels = resolve_past_fixings(note, &self.env)?;
        let future_dates: Vec<_> = note
            .coupon_dates()
            .iter()
            .copied()
            .filter(|&d| d > valuation)
            .collect();

        let expected = future_dates.len() + 1;
        if batch.n_obs() != expected {
            return Err(AutocallError::BatchShape {
                expected,
                actual: batch.n_obs(),
            });
        }

        let discounts: Vec<f64> = future_dates
            .iter()
            .map(|&date| self.env.discount(date))
            .collect::<Result<_, _>>()?;

        let n_paths = batch.n_paths();
        let path_pv = |path: usize| {
            // Column 0 is the time-zero level; simulated observations
            // start at column 1.
            let future_levels = &batch.row(path)[1..];
            path_present_value(note, strike, &past_levels, future_levels, &discounts)
        };

        #[cfg(feature = "parallel")]
        let total: f64 = (0..n_paths).into_par_iter().map(path_pv).sum();
        #[cfg(not(feature = "parallel"))]
        let total: f64 = (0..n_paths).map(path_pv).sum();

        if !total.is_finite() {
            return Err(AutocallError::NonFinite(
                "aggregate path contribution".to_string(),
            ));
        }

        Ok(total / n_paths as f64)
    }
}

/// Levels for every observation date at or before valuation, in schedule
/// order. A date without a fixing is a hard error, never a default.
fn resolve_past_fixings(
    note: &AutocallableNote,
    env: &MarketEnvironment,
) -> Result<Vec<f64>, AutocallError> {
    let valuation = env.valuation_date();
    note.coupon_dates()
        .iter()
        .filter(|&&date| date <= valuation)
        .map(|&date| note.fixing(date).ok_or(AutocallError::MissingFixing(date)))
        .collect()
}

/// One path through the barrier state machine.
///
/// Observation dates are visited in increasing order, past (fixed) levels
/// ahead of simulated ones. Payoffs at dates after valuation are
/// discounted and accumulated; past payoffs are settled history and only
/// move the memory counter.
fn path_present_value(
    note: &AutocallableNote,
    strike: f64,
    past_levels: &[f64],
    future_levels: &[f64],
    discounts: &[f64],
) -> f64 {
    let n_dates = note.coupon_dates().len();
    let n_past = past_levels.len();
    let memory = note.memory_indicator();
    let notional = note.notional();
    let coupon_rate = note.coupon_rate();

    let mut state = PathState::new();

    for idx in 0..n_dates {
        let level = if idx < n_past {
            past_levels[idx]
        } else {
            future_levels[idx - n_past]
        };
        let normalized = level / strike;
        let accrued = 1.0 + state.unpaid_coupons as f64 * memory;
        let mut payoff = 0.0;

        if idx == n_dates - 1 {
            // Expiration: coupon barrier, then protection, then shortfall.
            if normalized >= note.coupon_barrier() {
                payoff = notional * (1.0 + coupon_rate * accrued);
            } else if normalized >= note.protection_barrier() {
                payoff = notional;
            } else {
                payoff = notional * note.terminal_payoff().payoff_fraction(level, strike);
            }
        } else if normalized >= note.autocall_barrier() {
            payoff = notional * (1.0 + coupon_rate * accrued);
            state.called = true;
        } else if normalized >= note.coupon_barrier() {
            payoff = notional * coupon_rate * accrued;
            state.unpaid_coupons = 0;
        } else {
            state.unpaid_coupons += 1;
        }

        if idx >= n_past {
            state.pv += payoff * discounts[idx - n_past];
        }
        if state.called {
            break;
        }
    }

    state.pv
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use note_core::market_data::curves::Curve;
    use note_core::types::{Date, DayCountConvention};
    use note_models::instruments::{AutocallableNoteBuilder, TerminalPayoff};
    use proptest::prelude::*;

    const STRIKE: f64 = 100.0;
    const NOTIONAL: f64 = 1_000_000.0;

    fn valuation() -> Date {
        Date::from_ymd(2024, 7, 20).unwrap()
    }

    fn semiannual_dates(count: u32) -> Vec<Date> {
        (1..=count).map(|i| valuation().add_months(6 * i).unwrap()).collect()
    }

    fn env_with_rate(rate: f64) -> MarketEnvironment {
        MarketEnvironment::new(
            valuation(),
            STRIKE,
            Curve::flat(rate),
            Curve::flat(0.0),
            DayCountConvention::Act360,
        )
        .unwrap()
    }

    fn note_builder(dates: Vec<Date>) -> AutocallableNoteBuilder {
        AutocallableNoteBuilder::default()
            .coupon_dates(dates)
            .notional(NOTIONAL)
            .autocall_barrier(1.0)
            .coupon_barrier(1.0)
            .protection_barrier(0.6)
            .coupon_rate(0.05)
            .with_memory(true)
    }

    /// A batch whose single path takes the given normalized levels at the
    /// future observation dates (time-zero column prepended).
    fn single_path(normalized: &[f64]) -> PathBatch {
        let mut row = vec![STRIKE];
        row.extend(normalized.iter().map(|m| m * STRIKE));
        PathBatch::from_rows(vec![row]).unwrap()
    }

    // ========================================
    // Short-circuits
    // ========================================

    #[test]
    fn test_matured_note_prices_to_exactly_zero() {
        let engine = AutocallPayoffEngine::new(env_with_rate(0.02));
        // Entire schedule on or before the valuation date.
        let dates = vec![
            Date::from_ymd(2023, 7, 20).unwrap(),
            Date::from_ymd(2024, 1, 20).unwrap(),
            valuation(),
        ];
        let note = note_builder(dates)
            .past_fixing(Date::from_ymd(2023, 7, 20).unwrap(), 90.0)
            .build()
            .unwrap();

        let batch = single_path(&[1.0]);
        assert_eq!(engine.price(&note, &batch, STRIKE).unwrap(), 0.0);
    }

    #[test]
    fn test_already_autocalled_prices_to_exactly_zero() {
        let engine = AutocallPayoffEngine::new(env_with_rate(0.02));
        let past_date = Date::from_ymd(2024, 1, 20).unwrap();
        let mut dates = vec![past_date];
        dates.extend(semiannual_dates(4));
        let note = note_builder(dates)
            // Fixing exactly on the barrier: non-strict comparison calls it.
            .past_fixing(past_date, 100.0)
            .build()
            .unwrap();

        let batch = single_path(&[1.5, 1.5, 1.5, 1.5]);
        assert_eq!(engine.price(&note, &batch, STRIKE).unwrap(), 0.0);
    }

    #[test]
    fn test_missing_past_fixing_is_an_error() {
        let engine = AutocallPayoffEngine::new(env_with_rate(0.02));
        let past_date = Date::from_ymd(2024, 1, 20).unwrap();
        let mut dates = vec![past_date];
        dates.extend(semiannual_dates(2));
        let note = note_builder(dates).build().unwrap();

        let batch = single_path(&[1.0, 1.0]);
        let result = engine.price(&note, &batch, STRIKE);
        assert_eq!(result, Err(AutocallError::MissingFixing(past_date)));
    }

    #[test]
    fn test_invalid_strike_rejected() {
        let engine = AutocallPayoffEngine::new(env_with_rate(0.02));
        let note = note_builder(semiannual_dates(2)).build().unwrap();
        let batch = single_path(&[1.0, 1.0]);
        for strike in [0.0, -1.0, f64::NAN] {
            assert!(matches!(
                engine.price(&note, &batch, strike),
                Err(AutocallError::InvalidStrike(_))
            ));
        }
    }

    #[test]
    fn test_batch_shape_mismatch_rejected() {
        let engine = AutocallPayoffEngine::new(env_with_rate(0.02));
        let note = note_builder(semiannual_dates(4)).build().unwrap();
        let batch = single_path(&[1.0, 1.0]); // 3 columns, 5 expected
        assert!(matches!(
            engine.price(&note, &batch, STRIKE),
            Err(AutocallError::BatchShape {
                expected: 5,
                actual: 3
            })
        ));
    }

    // ========================================
    // State machine
    // ========================================

    #[test]
    fn test_spec_scenario_autocall_at_second_date_with_memory() {
        // Semiannual schedule, barriers 1.0/1.0/0.6, memory on. The path
        // misses the first observation at 0.95, clears 1.05 at the second:
        // autocall pays 1,000,000 * (1 + 0.05 * (1 + 1)) = 1,100,000
        // discounted at the second date; later dates contribute nothing.
        let engine = AutocallPayoffEngine::new(env_with_rate(0.02));
        let dates = semiannual_dates(10);
        let second_date = dates[1];
        let note = note_builder(dates).build().unwrap();

        let mut normalized = vec![0.95, 1.05];
        normalized.extend(vec![1.5; 8]); // must be ignored after the call
        let batch = single_path(&normalized);

        let df = engine.environment().discount(second_date).unwrap();
        let pv = engine.price(&note, &batch, STRIKE).unwrap();
        assert_relative_eq!(pv, 1_100_000.0 * df, epsilon = 1e-6);
    }

    #[test]
    fn test_memory_coupon_catch_up() {
        // Phoenix-style: coupon barrier below autocall. Two missed
        // observations bank two coupons; the third clears the coupon
        // barrier and pays 3 x coupon. The final date redeems 1 + c.
        let engine = AutocallPayoffEngine::new(env_with_rate(0.0));
        let note = note_builder(semiannual_dates(4))
            .coupon_barrier(0.9)
            .build()
            .unwrap();

        let batch = single_path(&[0.8, 0.85, 0.95, 0.95]);
        let pv = engine.price(&note, &batch, STRIKE).unwrap();
        let expected = NOTIONAL * (3.0 * 0.05) + NOTIONAL * 1.05;
        assert_abs_diff_eq!(pv, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_memory_off_pays_single_coupon() {
        let engine = AutocallPayoffEngine::new(env_with_rate(0.0));
        let note = note_builder(semiannual_dates(4))
            .coupon_barrier(0.9)
            .with_memory(false)
            .build()
            .unwrap();

        let batch = single_path(&[0.8, 0.85, 0.95, 0.95]);
        let pv = engine.price(&note, &batch, STRIKE).unwrap();
        let expected = NOTIONAL * 0.05 + NOTIONAL * 1.05;
        assert_abs_diff_eq!(pv, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_principal_returned_between_protection_and_coupon() {
        let engine = AutocallPayoffEngine::new(env_with_rate(0.0));
        let note = note_builder(semiannual_dates(2)).build().unwrap();

        // Final level 0.8: below the coupon barrier, above protection.
        let batch = single_path(&[0.7, 0.8]);
        let pv = engine.price(&note, &batch, STRIKE).unwrap();
        assert_abs_diff_eq!(pv, NOTIONAL, epsilon = 1e-9);
    }

    #[test]
    fn test_protection_breach_participates_linearly() {
        let engine = AutocallPayoffEngine::new(env_with_rate(0.0));
        let note = note_builder(semiannual_dates(2)).build().unwrap();

        let batch = single_path(&[0.7, 0.45]);
        let pv = engine.price(&note, &batch, STRIKE).unwrap();
        assert_abs_diff_eq!(pv, NOTIONAL * 0.45, epsilon = 1e-9);
    }

    #[test]
    fn test_custom_terminal_payoff_strategy() {
        fn floored(level: f64) -> f64 {
            (level / STRIKE).max(0.3)
        }
        let engine = AutocallPayoffEngine::new(env_with_rate(0.0));
        let note = note_builder(semiannual_dates(2))
            .terminal_payoff(TerminalPayoff::Custom(floored))
            .build()
            .unwrap();

        let batch = single_path(&[0.7, 0.1]);
        let pv = engine.price(&note, &batch, STRIKE).unwrap();
        assert_abs_diff_eq!(pv, NOTIONAL * 0.3, epsilon = 1e-9);
    }

    #[test]
    fn test_barrier_equality_counts_as_breach() {
        // Exactly on the autocall barrier at the first date: called.
        let engine = AutocallPayoffEngine::new(env_with_rate(0.0));
        let note = note_builder(semiannual_dates(3)).build().unwrap();
        let batch = single_path(&[1.0, 0.2, 0.2]);
        let pv = engine.price(&note, &batch, STRIKE).unwrap();
        assert_abs_diff_eq!(pv, NOTIONAL * 1.05, epsilon = 1e-9);
    }

    #[test]
    fn test_past_fixings_feed_memory_bookkeeping() {
        // One past observation below the coupon barrier: its missed
        // coupon must be caught up by the first simulated observation.
        let engine = AutocallPayoffEngine::new(env_with_rate(0.0));
        let past_date = Date::from_ymd(2024, 1, 20).unwrap();
        let mut dates = vec![past_date];
        dates.extend(semiannual_dates(2));
        let note = note_builder(dates)
            .coupon_barrier(0.9)
            .past_fixing(past_date, 80.0)
            .build()
            .unwrap();

        let batch = single_path(&[0.95, 0.95]);
        let pv = engine.price(&note, &batch, STRIKE).unwrap();
        // First future date: 2 coupons (1 banked + 1 current); final: 1 + c.
        let expected = NOTIONAL * (2.0 * 0.05) + NOTIONAL * 1.05;
        assert_abs_diff_eq!(pv, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_mean_over_paths() {
        let engine = AutocallPayoffEngine::new(env_with_rate(0.0));
        let note = note_builder(semiannual_dates(2)).build().unwrap();

        // Path 1 redeems principal plus coupon, path 2 principal only.
        let batch = PathBatch::from_rows(vec![
            vec![STRIKE, 70.0, 105.0],
            vec![STRIKE, 70.0, 80.0],
        ])
        .unwrap();
        let pv = engine.price(&note, &batch, STRIKE).unwrap();
        // Memory is on and the first date missed: final coupon pays double.
        let path1 = NOTIONAL * (1.0 + 0.05 * 2.0);
        let path2 = NOTIONAL;
        assert_abs_diff_eq!(pv, 0.5 * (path1 + path2), epsilon = 1e-6);
    }

    #[test]
    fn test_nan_terminal_payoff_fails_fast() {
        fn poisoned(_level: f64) -> f64 {
            f64::NAN
        }
        let engine = AutocallPayoffEngine::new(env_with_rate(0.0));
        let note = note_builder(semiannual_dates(2))
            .terminal_payoff(TerminalPayoff::Custom(poisoned))
            .build()
            .unwrap();

        let batch = single_path(&[0.7, 0.1]);
        assert!(matches!(
            engine.price(&note, &batch, STRIKE),
            Err(AutocallError::NonFinite(_))
        ));
    }

    proptest! {
        /// With a terminal payoff bounded below by zero, the PV estimate
        /// can never be negative, whatever the path does.
        #[test]
        fn prop_price_non_negative(
            levels in proptest::collection::vec(0.01f64..2.0, 4),
            autocall in 0.8f64..1.2,
            coupon in 0.5f64..1.2,
            protection in 0.1f64..0.8,
        ) {
            let engine = AutocallPayoffEngine::new(env_with_rate(0.02));
            let note = note_builder(semiannual_dates(4))
                .autocall_barrier(autocall)
                .coupon_barrier(coupon)
                .protection_barrier(protection)
                .build()
                .unwrap();

            let batch = single_path(&levels);
            let pv = engine.price(&note, &batch, STRIKE).unwrap();
            prop_assert!(pv >= 0.0);
        }
    }
}
