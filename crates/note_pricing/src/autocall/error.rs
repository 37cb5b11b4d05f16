//! Autocall pricing error types.

use note_core::market_data::MarketDataError;
use note_core::types::{Date, PricingError};
use thiserror::Error;

use crate::mc::{ConfigError, SimulationError};

/// Errors from autocallable payoff evaluation and pricing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AutocallError {
    /// Strike must be positive and finite.
    #[error("Invalid strike: {0} (positive value required)")]
    InvalidStrike(f64),

    /// A fixing is required for every observation date at or before the
    /// valuation date; defaulting a missing one would corrupt the
    /// already-autocalled check.
    #[error("Missing past fixing for observation date {0}")]
    MissingFixing(Date),

    /// The batch width does not match the note's future observation count
    /// plus the time-zero column.
    #[error("Batch has {actual} observation columns, expected {expected}")]
    BatchShape {
        /// Expected columns (future observations + 1).
        expected: usize,
        /// Actual columns.
        actual: usize,
    },

    /// A path contribution went non-finite; the estimate is abandoned
    /// rather than averaged.
    #[error("Non-finite value in {0}")]
    NonFinite(String),

    /// Discount curve lookup failed.
    #[error("Market data error: {0}")]
    Market(#[from] MarketDataError),

    /// Simulation configuration was invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Path simulation failed.
    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),
}

impl From<AutocallError> for PricingError {
    fn from(err: AutocallError) -> Self {
        match err {
            AutocallError::MissingFixing(date) => PricingError::MissingFixing(date),
            AutocallError::NonFinite(msg) => PricingError::NumericalFailure(msg),
            AutocallError::Simulation(inner) => inner.into(),
            other => PricingError::InvalidInput(other.to_string()),
        }
    }
}
