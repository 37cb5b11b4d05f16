//! Monte Carlo simulation configuration.

use super::error::ConfigError;

/// Maximum number of simulation paths allowed.
pub const MAX_PATHS: usize = 10_000_000;

/// Maximum internal steps per observation interval.
pub const MAX_STEPS_PER_INTERVAL: usize = 10_000;

/// Default RNG seed when none is configured.
pub const DEFAULT_SEED: u64 = 42;

/// Immutable Monte Carlo run configuration.
///
/// Use [`SimulationConfig::builder`] to construct instances; building
/// validates every field, so a config that exists is usable.
///
/// # Examples
///
/// ```rust
/// use note_pricing::mc::SimulationConfig;
///
/// let config = SimulationConfig::builder()
///     .n_paths(10_000)
///     .steps_per_interval(4)
///     .seed(7)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.n_paths(), 10_000);
/// assert_eq!(config.steps_per_interval(), 4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Number of simulation paths.
    n_paths: usize,
    /// Internal substeps per observation interval.
    steps_per_interval: usize,
    /// RNG seed.
    seed: u64,
}

impl SimulationConfig {
    /// Creates a configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Number of simulation paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Internal substeps per observation interval.
    ///
    /// The discretisation-bias control for the variance process: each
    /// observation interval is cut into this many equal Euler substeps.
    #[inline]
    pub fn steps_per_interval(&self) -> usize {
        self.steps_per_interval
    }

    /// RNG seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_paths == 0 || self.n_paths > MAX_PATHS {
            return Err(ConfigError::InvalidPathCount(self.n_paths));
        }
        if self.steps_per_interval < 2 || self.steps_per_interval > MAX_STEPS_PER_INTERVAL {
            return Err(ConfigError::InvalidStepsPerInterval(self.steps_per_interval));
        }
        Ok(())
    }
}

/// Builder for [`SimulationConfig`].
#[derive(Clone, Debug, Default)]
pub struct SimulationConfigBuilder {
    n_paths: Option<usize>,
    steps_per_interval: Option<usize>,
    seed: Option<u64>,
}

impl SimulationConfigBuilder {
    /// Sets the number of paths (required).
    #[inline]
    pub fn n_paths(mut self, n_paths: usize) -> Self {
        self.n_paths = Some(n_paths);
        self
    }

    /// Sets the substeps per observation interval (default 2).
    #[inline]
    pub fn steps_per_interval(mut self, steps: usize) -> Self {
        self.steps_per_interval = Some(steps);
        self
    }

    /// Sets the RNG seed (default [`DEFAULT_SEED`]).
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// `ConfigError` when `n_paths` is missing or any field is out of range.
    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let n_paths = self.n_paths.ok_or(ConfigError::InvalidParameter {
            name: "n_paths",
            value: "must be specified".to_string(),
        })?;

        let config = SimulationConfig {
            n_paths,
            steps_per_interval: self.steps_per_interval.unwrap_or(2),
            seed: self.seed.unwrap_or(DEFAULT_SEED),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = SimulationConfig::builder().n_paths(1000).build().unwrap();
        assert_eq!(config.n_paths(), 1000);
        assert_eq!(config.steps_per_interval(), 2);
        assert_eq!(config.seed(), DEFAULT_SEED);
    }

    #[test]
    fn test_builder_explicit_fields() {
        let config = SimulationConfig::builder()
            .n_paths(50_000)
            .steps_per_interval(8)
            .seed(123)
            .build()
            .unwrap();
        assert_eq!(config.steps_per_interval(), 8);
        assert_eq!(config.seed(), 123);
    }

    #[test]
    fn test_missing_paths_rejected() {
        let result = SimulationConfig::builder().build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter { name: "n_paths", .. })
        ));
    }

    #[test]
    fn test_invalid_path_count_rejected() {
        assert!(matches!(
            SimulationConfig::builder().n_paths(0).build(),
            Err(ConfigError::InvalidPathCount(0))
        ));
        assert!(SimulationConfig::builder().n_paths(MAX_PATHS + 1).build().is_err());
    }

    #[test]
    fn test_steps_per_interval_floor_of_two() {
        for steps in [0, 1] {
            assert!(matches!(
                SimulationConfig::builder()
                    .n_paths(100)
                    .steps_per_interval(steps)
                    .build(),
                Err(ConfigError::InvalidStepsPerInterval(_))
            ));
        }
        assert!(SimulationConfig::builder()
            .n_paths(100)
            .steps_per_interval(2)
            .build()
            .is_ok());
    }
}
