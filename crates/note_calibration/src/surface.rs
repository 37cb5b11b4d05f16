//! The quoted implied-volatility surface.

use note_core::types::Date;
use thiserror::Error;

/// Errors from surface construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// At least one expiry is required.
    #[error("Surface requires at least one expiry")]
    EmptyExpiries,

    /// At least one strike is required.
    #[error("Surface requires at least one strike")]
    EmptyStrikes,

    /// Expiries must be strictly increasing.
    #[error("Expiries are not strictly increasing at index {index}")]
    UnsortedExpiries {
        /// Index of the first offending expiry.
        index: usize,
    },

    /// Strikes must be positive and strictly increasing.
    #[error("Invalid strike {value} at index {index}")]
    InvalidStrike {
        /// Index of the offending strike.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// The vol grid must have one row per expiry and one column per strike.
    #[error("Volatility grid row {row} has length {actual}, expected {expected}")]
    DimensionMismatch {
        /// Offending row (the expiry index), or the row count itself.
        row: usize,
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// Quoted vols must be positive and finite.
    #[error("Invalid volatility {value} at (expiry {row}, strike {col})")]
    InvalidVolatility {
        /// Expiry index.
        row: usize,
        /// Strike index.
        col: usize,
        /// The offending quote.
        value: f64,
    },
}

/// An implied-volatility surface quoted on an (expiry, strike) grid.
///
/// Every cell is one independent calibration constraint; the surface is
/// never interpolated. Construction validates that the three collections
/// are mutually consistent, so a surface that exists is well formed.
///
/// # Examples
///
/// ```
/// use note_calibration::VolatilitySurface;
/// use note_core::types::Date;
///
/// let surface = VolatilitySurface::new(
///     vec![
///         Date::from_ymd(2025, 1, 20).unwrap(),
///         Date::from_ymd(2025, 7, 20).unwrap(),
///     ],
///     vec![72.0, 80.0, 88.0],
///     vec![
///         vec![0.37, 0.35, 0.34],
///         vec![0.36, 0.35, 0.345],
///     ],
/// ).unwrap();
///
/// assert_eq!(surface.quote_count(), 6);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct VolatilitySurface {
    /// Expiry dates, strictly increasing.
    expiries: Vec<Date>,
    /// Strikes, positive and strictly increasing.
    strikes: Vec<f64>,
    /// Implied vols, one row per expiry and one column per strike.
    vols: Vec<Vec<f64>>,
}

impl VolatilitySurface {
    /// Constructs a validated surface.
    ///
    /// # Errors
    ///
    /// A `SurfaceError` describing the first inconsistency found.
    pub fn new(
        expiries: Vec<Date>,
        strikes: Vec<f64>,
        vols: Vec<Vec<f64>>,
    ) -> Result<Self, SurfaceError> {
        if expiries.is_empty() {
            return Err(SurfaceError::EmptyExpiries);
        }
        if strikes.is_empty() {
            return Err(SurfaceError::EmptyStrikes);
        }
        for (index, pair) in expiries.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(SurfaceError::UnsortedExpiries { index: index + 1 });
            }
        }
        let mut prev = 0.0;
        for (index, &strike) in strikes.iter().enumerate() {
            if !(strike.is_finite() && strike > prev) {
                return Err(SurfaceError::InvalidStrike {
                    index,
                    value: strike,
                });
            }
            prev = strike;
        }
        if vols.len() != expiries.len() {
            return Err(SurfaceError::DimensionMismatch {
                row: vols.len(),
                expected: expiries.len(),
                actual: vols.len(),
            });
        }
        for (row, row_vols) in vols.iter().enumerate() {
            if row_vols.len() != strikes.len() {
                return Err(SurfaceError::DimensionMismatch {
                    row,
                    expected: strikes.len(),
                    actual: row_vols.len(),
                });
            }
            for (col, &vol) in row_vols.iter().enumerate() {
                if !(vol.is_finite() && vol > 0.0) {
                    return Err(SurfaceError::InvalidVolatility {
                        row,
                        col,
                        value: vol,
                    });
                }
            }
        }

        Ok(Self {
            expiries,
            strikes,
            vols,
        })
    }

    /// Expiry dates.
    #[inline]
    pub fn expiries(&self) -> &[Date] {
        &self.expiries
    }

    /// Strikes.
    #[inline]
    pub fn strikes(&self) -> &[f64] {
        &self.strikes
    }

    /// The quoted vol for (expiry index, strike index).
    #[inline]
    pub fn vol(&self, expiry_idx: usize, strike_idx: usize) -> f64 {
        self.vols[expiry_idx][strike_idx]
    }

    /// Total number of quotes (calibration constraints).
    #[inline]
    pub fn quote_count(&self) -> usize {
        self.expiries.len() * self.strikes.len()
    }

    /// Iterates over all `(expiry, strike, vol)` quotes in row-major order.
    pub fn quotes(&self) -> impl Iterator<Item = (Date, f64, f64)> + '_ {
        self.expiries.iter().enumerate().flat_map(move |(i, &expiry)| {
            self.strikes
                .iter()
                .enumerate()
                .map(move |(j, &strike)| (expiry, strike, self.vols[i][j]))
        })
    }
}
