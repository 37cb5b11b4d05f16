//! # note_core: Market-Data Foundation for Autocallable Pricing
//!
//! ## Layer 1 (Foundation) Role
//!
//! note_core is the bottom layer of the workspace, providing:
//! - Time types: `Date`, `DayCountConvention` (`types::time`)
//! - Error types: `PricingError`, `DateError` (`types::error`)
//! - Yield curves: `YieldCurve`, `FlatCurve`, `InterpolatedCurve`, `Curve`
//!   (`market_data::curves`)
//! - The pricing context: `MarketEnvironment` (`market_data::environment`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other note_* crates, with minimal external
//! dependencies:
//! - num-traits: Traits for generic numerical computation
//! - chrono: Date arithmetic
//! - thiserror: Structured error types
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use note_core::market_data::curves::{Curve, YieldCurve};
//! use note_core::types::{Date, DayCountConvention};
//!
//! // Date operations
//! let start = Date::from_ymd(2024, 7, 20).unwrap();
//! let end = Date::from_ymd(2025, 1, 20).unwrap();
//! let yf = DayCountConvention::Act360.year_fraction_dates(start, end);
//! assert!(yf > 0.5 && yf < 0.52);
//!
//! // Curve queries
//! let curve = Curve::flat(0.02_f64);
//! let df = curve.discount_factor(1.0).unwrap();
//! assert!((df - (-0.02_f64).exp()).abs() < 1e-12);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for `Date`, `DayCountConvention`, and the
//!   curve types

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod types;
