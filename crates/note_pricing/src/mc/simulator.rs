//! The path simulator.

use note_models::models::stochastic::StochasticProcess;

use super::batch::PathBatch;
use super::config::MAX_PATHS;
use super::error::{ConfigError, SimulationError};
use crate::rng::SimulationRng;

/// Advances a stochastic process over an observation grid into a
/// [`PathBatch`].
///
/// Each observation interval is subdivided into `steps_per_interval` equal
/// Euler substeps (minimum two, the discretisation-bias floor for the
/// variance factor). Substep drifts are read from the process's curves
/// once, before the path loop, so the per-path work is a pure function of
/// the pre-drawn normals.
///
/// # Stream ordering
///
/// Paths are drawn one after another from the caller's RNG, consuming
/// `brownian_dim()` normals per substep in a fixed order. Simulating
/// `n + m` paths therefore reproduces the first `n` paths of the same
/// seed exactly and appends `m` new ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathSimulator {
    /// Substeps per observation interval.
    steps_per_interval: usize,
}

impl PathSimulator {
    /// Creates a simulator with the given substep policy.
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidStepsPerInterval` below the floor of two.
    pub fn new(steps_per_interval: usize) -> Result<Self, ConfigError> {
        if steps_per_interval < 2 || steps_per_interval > super::config::MAX_STEPS_PER_INTERVAL {
            return Err(ConfigError::InvalidStepsPerInterval(steps_per_interval));
        }
        Ok(Self { steps_per_interval })
    }

    /// Returns the substep policy.
    #[inline]
    pub fn steps_per_interval(&self) -> usize {
        self.steps_per_interval
    }

    /// Simulates `n_paths` trajectories observed at `observation_times`.
    ///
    /// # Arguments
    ///
    /// * `process` - The process to advance; column 0 of the result equals
    ///   its initial level on every row
    /// * `observation_times` - Year fractions starting at exactly 0.0,
    ///   strictly increasing, at least two entries
    /// * `n_paths` - Number of independent trajectories
    /// * `rng` - The normal-variate source; owned streams make runs
    ///   reproducible
    ///
    /// # Errors
    ///
    /// - Grid or path-count validation failures (invalid-argument class)
    /// - `SimulationError::NonFinite` if any simulated level is NaN or
    ///   infinite; no partial batch is returned
    pub fn simulate<P, R>(
        &self,
        process: &P,
        observation_times: &[f64],
        n_paths: usize,
        rng: &mut R,
    ) -> Result<PathBatch, SimulationError>
    where
        P: StochasticProcess,
        R: SimulationRng,
    {
        validate_time_grid(observation_times)?;
        if n_paths == 0 || n_paths > MAX_PATHS {
            return Err(SimulationError::InvalidPathCount(n_paths));
        }

        // Substep grid and drifts, computed once for all paths.
        let mut substeps: Vec<(f64, f64)> = Vec::new(); // (dt, drift)
        for window in observation_times.windows(2) {
            let (t0, t1) = (window[0], window[1]);
            let dt = (t1 - t0) / self.steps_per_interval as f64;
            for k in 0..self.steps_per_interval {
                let a = t0 + dt * k as f64;
                let b = a + dt;
                let drift = process.step_drift(a, b)?;
                substeps.push((dt, drift));
            }
        }

        let n_obs = observation_times.len();
        let steps = self.steps_per_interval;
        let dim = process.brownian_dim();
        let mut dz = vec![0.0; dim];
        let mut data = vec![0.0; n_paths * n_obs];

        for path in 0..n_paths {
            let row = path * n_obs;
            let mut state = process.initial_state();
            data[row] = P::level(&state);

            for (i, chunk) in substeps.chunks_exact(steps).enumerate() {
                for &(dt, drift) in chunk {
                    rng.fill_normal(&mut dz);
                    state = process.evolve_step(state, dt, drift, &dz);
                }
                let level = P::level(&state);
                if !level.is_finite() {
                    return Err(SimulationError::NonFinite {
                        path,
                        observation: i + 1,
                    });
                }
                data[row + i + 1] = level;
            }
        }

        Ok(PathBatch::from_raw(data, n_paths, n_obs))
    }
}

fn validate_time_grid(times: &[f64]) -> Result<(), SimulationError> {
    if times.len() < 2 {
        return Err(SimulationError::TimeGridTooShort(times.len()));
    }
    if times[0] != 0.0 {
        return Err(SimulationError::TimeGridOrigin(times[0]));
    }
    for (index, window) in times.windows(2).enumerate() {
        if !(window[1].is_finite() && window[1] > window[0]) {
            return Err(SimulationError::UnsortedTimeGrid { index: index + 1 });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::MonteCarloRng;
    use approx::assert_relative_eq;
    use note_core::market_data::curves::Curve;
    use note_models::models::heston::{HestonParams, HestonProcess};

    fn sample_process(rate: f64, dividend: f64) -> HestonProcess {
        HestonProcess::new(
            100.0,
            HestonParams::new(0.04, 1.5, 0.04, 0.3, -0.7).unwrap(),
            Curve::flat(rate),
            Curve::flat(dividend),
        )
        .unwrap()
    }

    #[test]
    fn test_substep_floor_enforced() {
        assert!(PathSimulator::new(1).is_err());
        assert!(PathSimulator::new(0).is_err());
        assert_eq!(PathSimulator::new(2).unwrap().steps_per_interval(), 2);
    }

    #[test]
    fn test_batch_shape_and_initial_column() {
        let simulator = PathSimulator::new(2).unwrap();
        let process = sample_process(0.02, 0.0);
        let mut rng = MonteCarloRng::from_seed(42);
        let batch = simulator
            .simulate(&process, &[0.0, 0.5, 1.0, 1.5], 25, &mut rng)
            .unwrap();

        assert_eq!(batch.n_paths(), 25);
        assert_eq!(batch.n_obs(), 4);
        for path in 0..25 {
            assert_eq!(batch.level(path, 0), 100.0);
        }
    }

    #[test]
    fn test_levels_positive_and_finite() {
        let simulator = PathSimulator::new(4).unwrap();
        let process = sample_process(0.02, 0.028);
        let mut rng = MonteCarloRng::from_seed(7);
        let batch = simulator
            .simulate(&process, &[0.0, 0.5, 1.0], 500, &mut rng)
            .unwrap();
        for row in batch.rows() {
            for &level in row {
                assert!(level > 0.0 && level.is_finite());
            }
        }
    }

    #[test]
    fn test_deterministic_for_same_seed() {
        let simulator = PathSimulator::new(2).unwrap();
        let process = sample_process(0.02, 0.0);

        let mut rng_a = MonteCarloRng::from_seed(2024);
        let mut rng_b = MonteCarloRng::from_seed(2024);
        let a = simulator
            .simulate(&process, &[0.0, 1.0, 2.0], 50, &mut rng_a)
            .unwrap();
        let b = simulator
            .simulate(&process, &[0.0, 1.0, 2.0], 50, &mut rng_b)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_growing_path_count_appends() {
        let simulator = PathSimulator::new(2).unwrap();
        let process = sample_process(0.02, 0.0);

        let mut rng_small = MonteCarloRng::from_seed(99);
        let mut rng_large = MonteCarloRng::from_seed(99);
        let small = simulator
            .simulate(&process, &[0.0, 0.5, 1.0], 20, &mut rng_small)
            .unwrap();
        let large = simulator
            .simulate(&process, &[0.0, 0.5, 1.0], 60, &mut rng_large)
            .unwrap();

        for path in 0..20 {
            assert_eq!(small.row(path), large.row(path), "path {} replayed", path);
        }
    }

    #[test]
    fn test_invalid_grids_rejected() {
        let simulator = PathSimulator::new(2).unwrap();
        let process = sample_process(0.02, 0.0);
        let mut rng = MonteCarloRng::from_seed(1);

        assert!(matches!(
            simulator.simulate(&process, &[0.0], 10, &mut rng),
            Err(SimulationError::TimeGridTooShort(1))
        ));
        assert!(matches!(
            simulator.simulate(&process, &[0.5, 1.0], 10, &mut rng),
            Err(SimulationError::TimeGridOrigin(_))
        ));
        assert!(matches!(
            simulator.simulate(&process, &[0.0, 1.0, 0.5], 10, &mut rng),
            Err(SimulationError::UnsortedTimeGrid { index: 2 })
        ));
        assert!(matches!(
            simulator.simulate(&process, &[0.0, 1.0, 1.0], 10, &mut rng),
            Err(SimulationError::UnsortedTimeGrid { index: 2 })
        ));
        assert!(matches!(
            simulator.simulate(&process, &[0.0, 1.0], 0, &mut rng),
            Err(SimulationError::InvalidPathCount(0))
        ));
    }

    #[test]
    fn test_discounted_terminal_mean_matches_forward() {
        // Martingale check: E[S_T] should equal the forward
        // S0 * exp((r - q) T) within Monte Carlo error.
        let simulator = PathSimulator::new(4).unwrap();
        let process = sample_process(0.03, 0.01);
        let mut rng = MonteCarloRng::from_seed(20240720);
        let n_paths = 40_000;
        let batch = simulator
            .simulate(&process, &[0.0, 0.5, 1.0], n_paths, &mut rng)
            .unwrap();

        let mean: f64 = (0..n_paths).map(|p| batch.level(p, 2)).sum::<f64>() / n_paths as f64;
        let forward = 100.0 * (0.02_f64).exp();
        assert_relative_eq!(mean, forward, max_relative = 0.01);
    }
}
