//! Simulate-then-evaluate orchestration for autocallable pricing.

use note_core::market_data::MarketEnvironment;
use note_models::instruments::AutocallableNote;
use note_models::models::stochastic::StochasticProcess;

use super::engine::AutocallPayoffEngine;
use super::error::AutocallError;
use crate::mc::{PathSimulator, SimulationConfig};
use crate::rng::MonteCarloRng;

/// Prices an autocallable note from a calibrated process in one call.
///
/// Wires together the pre-pricing short-circuits, the observation grid,
/// the path simulator, and the payoff engine. The short-circuits run
/// first so a matured or already-called note never pays for a simulation.
///
/// # Examples
///
/// ```rust,ignore
/// use note_pricing::autocall::AutocallPricer;
/// use note_pricing::mc::SimulationConfig;
///
/// let pricer = AutocallPricer::new(env);
/// let config = SimulationConfig::builder().n_paths(10_000).build()?;
/// let pv = pricer.price(&note, &process, strike, &config)?;
/// ```
#[derive(Debug, Clone)]
pub struct AutocallPricer {
    env: MarketEnvironment,
}

impl AutocallPricer {
    /// Creates a pricer for one market environment.
    pub fn new(env: MarketEnvironment) -> Self {
        Self { env }
    }

    /// Returns the pricer's environment.
    pub fn environment(&self) -> &MarketEnvironment {
        &self.env
    }

    /// Monte Carlo present value of the note under the given process.
    ///
    /// Builds the observation grid from the note's future coupon dates
    /// (time zero plus one year fraction per date after valuation),
    /// simulates `config.n_paths()` trajectories with a stream seeded from
    /// `config.seed()`, and hands the batch to the payoff engine.
    ///
    /// # Errors
    ///
    /// Short-circuit, configuration, simulation, and payoff errors, each
    /// preserving its class (invalid argument, numerical failure, data
    /// gap).
    pub fn price<P: StochasticProcess>(
        &self,
        note: &AutocallableNote,
        process: &P,
        strike: f64,
        config: &SimulationConfig,
    ) -> Result<f64, AutocallError> {
        let engine = AutocallPayoffEngine::new(self.env.clone());

        if let Some(settled) = engine.short_circuit(note, strike)? {
            return Ok(settled);
        }

        let valuation = self.env.valuation_date();
        let mut times = Vec::with_capacity(note.coupon_dates().len() + 1);
        times.push(0.0);
        times.extend(
            note.coupon_dates()
                .iter()
                .filter(|&&date| date > valuation)
                .map(|&date| self.env.year_fraction(date)),
        );

        let simulator = PathSimulator::new(config.steps_per_interval())?;
        let mut rng = MonteCarloRng::from_seed(config.seed());
        let batch = simulator.simulate(process, &times, config.n_paths(), &mut rng)?;

        engine.price(note, &batch, strike)
    }
}
