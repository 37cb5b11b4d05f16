//! # note_models (L2: Models and Products)
//!
//! Stochastic models, analytical pricing formulas, and structured-product
//! definitions.
//!
//! This crate provides:
//! - The Heston stochastic-volatility model: validated parameters and the
//!   simulatable process handle (`models::heston`)
//! - The `StochasticProcess` seam the Monte Carlo simulator is generic over
//!   (`models::stochastic`)
//! - Analytical formulas: Black-Scholes, the semi-closed-form Heston call
//!   price used by calibration, and implied volatility (`analytical`)
//! - The autocallable note product definition with builder validation
//!   (`instruments::autocallable`)
//!
//! ## Design Principles
//!
//! - **Enum/builder-based definitions** for static dispatch and validated
//!   construction
//! - **Typed errors per module** with `thiserror`, converted upward where a
//!   single error type is wanted
//! - **No ambient state**: every function takes its market inputs explicitly

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod instruments;
pub mod models;
