//! Stochastic models.

pub mod heston;
pub mod stochastic;

pub use heston::{HestonError, HestonParams, HestonProcess};
pub use stochastic::{StochasticProcess, TwoFactorState};
