//! The stochastic process seam consumed by the Monte Carlo simulator.

use note_core::market_data::MarketDataError;

/// State of a two-factor diffusion: observable level plus latent variance.
///
/// For the Heston model the first factor is the asset level and the second
/// the instantaneous variance. The variance is allowed to dip below zero in
/// the raw state under the full-truncation scheme; it is floored wherever it
/// enters drift or diffusion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TwoFactorState {
    /// Asset level.
    pub level: f64,
    /// Instantaneous variance.
    pub variance: f64,
}

/// A simulatable stochastic process.
///
/// This is the contract the path simulator is generic over: the process
/// exposes its initial state, the number of independent normals it consumes
/// per step, the annualised carry over a time interval (read from its
/// curves once, before the path loop), and a pure one-step transition.
///
/// # Determinism
///
/// `evolve_step` must be a pure function of its arguments. All randomness
/// enters through the `dz` slice, whose length is `brownian_dim()`, so the
/// simulator fully controls the random stream ordering.
pub trait StochasticProcess {
    /// Per-path state advanced by `evolve_step`.
    type State: Copy + std::fmt::Debug;

    /// State at time zero.
    fn initial_state(&self) -> Self::State;

    /// Number of independent standard normals consumed per step.
    fn brownian_dim(&self) -> usize;

    /// Annualised drift of the log level over `[t0, t1]`, implied by the
    /// process's curves.
    ///
    /// # Errors
    ///
    /// Propagates curve query failures for an invalid interval.
    fn step_drift(&self, t0: f64, t1: f64) -> Result<f64, MarketDataError>;

    /// Advances the state by `dt` using the supplied drift and normal draws.
    fn evolve_step(&self, state: Self::State, dt: f64, drift: f64, dz: &[f64]) -> Self::State;

    /// Observable level of a state (the quantity recorded in path batches).
    fn level(state: &Self::State) -> f64;

    /// Human-readable model name.
    fn model_name() -> &'static str
    where
        Self: Sized;
}
