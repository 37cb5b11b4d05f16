//! Instrument validation error types.

use note_core::types::{Date, PricingError};
use thiserror::Error;

/// Errors from product construction.
///
/// All of these are invalid-argument failures raised by builders; a note
/// that exists has passed every one of these checks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InstrumentError {
    /// The coupon schedule needs at least one observation date.
    #[error("Coupon schedule must contain at least one date")]
    EmptySchedule,

    /// Coupon dates must be strictly increasing.
    #[error("Coupon schedule is not strictly increasing at index {index}")]
    UnsortedSchedule {
        /// Index of the first date that does not increase.
        index: usize,
    },

    /// Notional must be positive and finite.
    #[error("Invalid notional: {0} (positive value required)")]
    InvalidNotional(f64),

    /// A barrier level is outside its admissible range.
    #[error("Invalid {name} barrier: {value}")]
    InvalidBarrier {
        /// Which barrier failed validation.
        name: &'static str,
        /// The offending value.
        value: f64,
    },

    /// Coupon rate must be non-negative and finite.
    #[error("Invalid coupon rate: {0}")]
    InvalidCouponRate(f64),

    /// A supplied past fixing level is not a positive finite number.
    #[error("Invalid past fixing {level} for date {date}")]
    InvalidFixing {
        /// The fixing date.
        date: Date,
        /// The offending level.
        level: f64,
    },

    /// A required builder field was never set.
    #[error("Required field '{name}' was not specified")]
    MissingField {
        /// The missing field name.
        name: &'static str,
    },
}

impl From<InstrumentError> for PricingError {
    fn from(err: InstrumentError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}
