//! Error types for the Monte Carlo kernel.

use note_core::types::PricingError;
use thiserror::Error;

/// Configuration errors raised at build time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Path count outside [1, 10_000_000].
    #[error("Invalid path count {0}: must be in range [1, 10_000_000]")]
    InvalidPathCount(usize),

    /// Fewer than two internal steps per observation interval.
    ///
    /// Two substeps per interval is the floor of the discretisation-bias
    /// policy for the variance process.
    #[error("Invalid steps per interval {0}: must be in range [2, 10_000]")]
    InvalidStepsPerInterval(usize),

    /// A required builder field was never set.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },
}

/// Runtime errors raised by the path simulator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// The observation grid needs at least two entries (time zero plus one
    /// future observation).
    #[error("Observation grid has {0} entries, at least 2 required")]
    TimeGridTooShort(usize),

    /// The observation grid must start at exactly zero.
    #[error("Observation grid must start at 0, got {0}")]
    TimeGridOrigin(f64),

    /// Observation times must be finite and strictly increasing.
    #[error("Observation grid is not strictly increasing at index {index}")]
    UnsortedTimeGrid {
        /// Index of the first non-increasing entry.
        index: usize,
    },

    /// Path count must be at least one and within the configured maximum.
    #[error("Invalid path count: {0}")]
    InvalidPathCount(usize),

    /// A simulated level went non-finite; the batch is discarded rather
    /// than handed to the payoff engine.
    #[error("Non-finite level at path {path}, observation {observation}")]
    NonFinite {
        /// Path row.
        path: usize,
        /// Observation column.
        observation: usize,
    },

    /// Curve lookup failed while precomputing step drifts.
    #[error("Market data error: {0}")]
    Market(#[from] note_core::market_data::MarketDataError),

    /// A hand-assembled batch was not rectangular.
    #[error("Batch row {row} has length {actual}, expected {expected}")]
    RaggedRows {
        /// Offending row index.
        row: usize,
        /// Expected row length.
        expected: usize,
        /// Actual row length.
        actual: usize,
    },
}

impl From<ConfigError> for PricingError {
    fn from(err: ConfigError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}

impl From<SimulationError> for PricingError {
    fn from(err: SimulationError) -> Self {
        match err {
            SimulationError::NonFinite { .. } => PricingError::NumericalFailure(err.to_string()),
            other => PricingError::InvalidInput(other.to_string()),
        }
    }
}
