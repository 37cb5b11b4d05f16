//! Analytical pricing error types.

use note_core::types::PricingError;
use thiserror::Error;

/// Errors from closed-form and semi-closed-form pricing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticalError {
    /// Spot must be positive and finite.
    #[error("Invalid spot: {spot} (positive value required)")]
    InvalidSpot {
        /// The offending spot.
        spot: f64,
    },

    /// Strike must be positive and finite.
    #[error("Invalid strike: {strike} (positive value required)")]
    InvalidStrike {
        /// The offending strike.
        strike: f64,
    },

    /// Volatility must be positive and finite.
    #[error("Invalid volatility: {volatility} (positive value required)")]
    InvalidVolatility {
        /// The offending volatility.
        volatility: f64,
    },

    /// Expiry must be positive and finite.
    #[error("Invalid expiry: {expiry} (positive value required)")]
    InvalidExpiry {
        /// The offending expiry.
        expiry: f64,
    },

    /// A formula produced NaN or infinity.
    #[error("Non-finite value in {0}")]
    NonFinite(String),

    /// No volatility reproduces the requested price within arbitrage bounds.
    #[error("No implied volatility solution: {0}")]
    NoSolution(String),
}

impl From<AnalyticalError> for PricingError {
    fn from(err: AnalyticalError) -> Self {
        match err {
            AnalyticalError::NonFinite(msg) => PricingError::NumericalFailure(msg),
            AnalyticalError::NoSolution(msg) => PricingError::NumericalFailure(msg),
            other => PricingError::InvalidInput(other.to_string()),
        }
    }
}
