//! # note_calibration (L2.5: Calibration)
//!
//! Fits Heston model parameters to an observed option-implied volatility
//! surface by bound-constrained least squares.
//!
//! This crate sits between the model definitions and the Monte Carlo
//! pricing layer, solving the inverse problem that turns market quotes
//! into a simulatable [`note_models::models::heston::HestonProcess`].
//!
//! ## Modules
//!
//! - `surface`: the quoted implied-volatility surface
//! - `constraints`: one pricing constraint per (expiry, strike) quote
//! - `optimisers`: the `Optimizer` capability with differential-evolution
//!   and Nelder-Mead presets
//! - `engine`: the calibration engine tying the pieces together
//!
//! ## Example
//!
//! ```rust,ignore
//! use note_calibration::{CalibrationEngine, DifferentialEvolution, ParameterBounds};
//!
//! let engine = CalibrationEngine::new(env);
//! let (process, params) = engine.calibrate(
//!     initial_params,
//!     &surface,
//!     &bounds,
//!     &DifferentialEvolution::default(),
//! )?;
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod constraints;
pub mod engine;
pub mod error;
pub mod optimisers;
pub mod surface;

pub use constraints::OptionConstraint;
pub use engine::CalibrationEngine;
pub use error::CalibrationError;
pub use optimisers::{
    DifferentialEvolution, NelderMead, OptimisationOutcome, Optimizer, OptimiserError,
    ParameterBounds,
};
pub use surface::{SurfaceError, VolatilitySurface};
