//! Calibration error types.

use note_core::market_data::MarketDataError;
use note_core::types::{Date, PricingError};
use note_models::analytical::AnalyticalError;
use note_models::models::heston::HestonError;
use thiserror::Error;

use crate::optimisers::OptimiserError;
use crate::surface::SurfaceError;

/// Errors from the calibration engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// The surface failed validation.
    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),

    /// Exactly five parameter bounds are required (v0, kappa, theta, sigma, rho).
    #[error("Expected 5 parameter bounds, got {0}")]
    BoundsDimension(usize),

    /// A bound must be finite with lower <= upper.
    #[error("Invalid bound [{lower}, {upper}] at index {index}")]
    InvalidBound {
        /// Parameter index.
        index: usize,
        /// Lower bound.
        lower: f64,
        /// Upper bound.
        upper: f64,
    },

    /// A quote expires on or before the valuation date.
    #[error("Quote expiry {0} is not after the valuation date")]
    ExpiredQuote(Date),

    /// Constraint construction failed in the analytical layer.
    #[error("Analytical error: {0}")]
    Analytical(#[from] AnalyticalError),

    /// Curve lookup failed.
    #[error("Market data error: {0}")]
    Market(#[from] MarketDataError),

    /// Model parameter construction failed.
    #[error("Model error: {0}")]
    Model(#[from] HestonError),

    /// The optimiser itself failed.
    #[error("Optimiser error: {0}")]
    Optimiser(#[from] OptimiserError),

    /// The optimiser produced a non-finite or inadmissible best vector.
    #[error("Numerical failure: {0}")]
    Numerical(String),
}

impl From<CalibrationError> for PricingError {
    fn from(err: CalibrationError) -> Self {
        match err {
            CalibrationError::Numerical(msg) => PricingError::NumericalFailure(msg),
            CalibrationError::Analytical(inner) => inner.into(),
            other => PricingError::InvalidInput(other.to_string()),
        }
    }
}
