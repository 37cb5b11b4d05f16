//! Error types for structured error handling.
//!
//! This module provides:
//! - `PricingError`: The workspace-level error taxonomy
//! - `DateError`: Errors from date construction and parsing
//!
//! Every failure in the workspace belongs to one of three classes, all
//! surfaced to the caller and never silently corrected:
//! - invalid arguments (malformed schedules, mismatched lengths, bad counts)
//! - numerical failures (non-finite intermediates, unstable parameters)
//! - data gaps (a required past fixing that was not supplied)

use super::time::Date;
use thiserror::Error;

/// Workspace-level pricing error.
///
/// Lower layers define their own precise error enums; this type is the
/// common denominator they convert into when a caller wants a single
/// error type across calibration and pricing.
///
/// # Examples
/// ```
/// use note_core::types::PricingError;
///
/// let err = PricingError::InvalidInput("notional must be positive".to_string());
/// assert_eq!(format!("{}", err), "Invalid input: notional must be positive");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    /// Invalid market data, product terms, or configuration.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A computation produced a non-finite or numerically unstable result.
    #[error("Numerical failure: {0}")]
    NumericalFailure(String),

    /// A required past fixing is missing for an observation date at or
    /// before the valuation date.
    #[error("Missing past fixing for observation date {0}")]
    MissingFixing(Date),
}

/// Errors from date construction and parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// The (year, month, day) triple does not form a valid calendar date.
    #[error("Invalid date: {year}-{month:02}-{day:02}")]
    InvalidDate {
        /// Year component.
        year: i32,
        /// Month component (1-12).
        month: u32,
        /// Day component (1-31).
        day: u32,
    },

    /// The input string is not an ISO 8601 (YYYY-MM-DD) date.
    #[error("Failed to parse date: {0}")]
    ParseError(String),

    /// Date arithmetic moved outside the representable range.
    #[error("Date arithmetic out of range: {0}")]
    OutOfRange(String),
}
