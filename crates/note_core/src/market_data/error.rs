//! Market data error types.

use thiserror::Error;

/// Errors from curve construction and queries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// Maturity outside the valid domain of a curve query.
    #[error("Invalid maturity t = {t}")]
    InvalidMaturity {
        /// The offending time to maturity in years.
        t: f64,
    },

    /// A curve needs at least one pillar.
    #[error("Curve requires at least one pillar")]
    EmptyCurve,

    /// Curve pillar times must be positive and strictly increasing.
    #[error("Curve pillars must be positive and strictly increasing at index {index}")]
    UnsortedPillars {
        /// Index of the first offending pillar.
        index: usize,
    },

    /// Discount factors must lie in (0, 1] and be non-increasing.
    #[error("Invalid discount factor {df} at index {index}")]
    InvalidDiscountFactor {
        /// The offending discount factor.
        df: f64,
        /// Index of the offending pillar.
        index: usize,
    },

    /// The spot level of an environment must be positive and finite.
    #[error("Invalid spot level: {spot}")]
    InvalidSpot {
        /// The offending spot level.
        spot: f64,
    },
}
