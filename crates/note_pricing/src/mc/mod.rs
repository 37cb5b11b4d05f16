//! Monte Carlo path simulation.
//!
//! - [`SimulationConfig`]: builder-validated path/step policy
//! - [`PathBatch`]: the dense, immutable batch of simulated levels
//! - [`PathSimulator`]: advances a stochastic process over an observation
//!   grid

mod batch;
mod config;
mod error;
mod simulator;

pub use batch::PathBatch;
pub use config::{
    SimulationConfig, SimulationConfigBuilder, DEFAULT_SEED, MAX_PATHS, MAX_STEPS_PER_INTERVAL,
};
pub use error::{ConfigError, SimulationError};
pub use simulator::PathSimulator;
