//! Dense batch of simulated path levels.

use super::error::SimulationError;

/// A batch of simulated paths.
///
/// Row-major storage: `n_paths` rows, each with `n_obs` levels where
/// column 0 is the time-zero level. Produced once per pricing call by the
/// simulator (or assembled from explicit rows for replayed/deterministic
/// paths) and immutable afterwards; the payoff engine only reads it.
#[derive(Clone, Debug, PartialEq)]
pub struct PathBatch {
    /// Row-major levels, `n_paths * n_obs` entries.
    data: Vec<f64>,
    /// Number of paths (rows).
    n_paths: usize,
    /// Number of observations per path (columns), including time zero.
    n_obs: usize,
}

impl PathBatch {
    /// Assembles a batch from pre-computed rows.
    ///
    /// Used by tests and by callers replaying externally supplied paths
    /// through the payoff engine.
    ///
    /// # Errors
    ///
    /// `SimulationError::RaggedRows` when rows differ in length,
    /// `SimulationError::InvalidPathCount` when `rows` is empty, and
    /// `SimulationError::TimeGridTooShort` for rows shorter than 2.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, SimulationError> {
        if rows.is_empty() {
            return Err(SimulationError::InvalidPathCount(0));
        }
        let n_obs = rows[0].len();
        if n_obs < 2 {
            return Err(SimulationError::TimeGridTooShort(n_obs));
        }
        for (row, levels) in rows.iter().enumerate() {
            if levels.len() != n_obs {
                return Err(SimulationError::RaggedRows {
                    row,
                    expected: n_obs,
                    actual: levels.len(),
                });
            }
        }

        let n_paths = rows.len();
        let mut data = Vec::with_capacity(n_paths * n_obs);
        for row in rows {
            data.extend_from_slice(&row);
        }
        Ok(Self {
            data,
            n_paths,
            n_obs,
        })
    }

    /// Internal constructor for the simulator, which guarantees shape.
    pub(crate) fn from_raw(data: Vec<f64>, n_paths: usize, n_obs: usize) -> Self {
        debug_assert_eq!(data.len(), n_paths * n_obs);
        Self {
            data,
            n_paths,
            n_obs,
        }
    }

    /// Number of paths (rows).
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Number of observations per path (columns), including time zero.
    #[inline]
    pub fn n_obs(&self) -> usize {
        self.n_obs
    }

    /// One path's levels in observation order.
    #[inline]
    pub fn row(&self, path: usize) -> &[f64] {
        let start = path * self.n_obs;
        &self.data[start..start + self.n_obs]
    }

    /// The level of one path at one observation.
    #[inline]
    pub fn level(&self, path: usize, observation: usize) -> f64 {
        self.data[path * self.n_obs + observation]
    }

    /// Iterates over paths as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.n_obs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_valid() {
        let batch = PathBatch::from_rows(vec![
            vec![100.0, 105.0, 98.0],
            vec![100.0, 95.0, 101.0],
        ])
        .unwrap();
        assert_eq!(batch.n_paths(), 2);
        assert_eq!(batch.n_obs(), 3);
        assert_eq!(batch.level(0, 1), 105.0);
        assert_eq!(batch.row(1), &[100.0, 95.0, 101.0]);
        assert_eq!(batch.rows().count(), 2);
    }

    #[test]
    fn test_from_rows_empty_rejected() {
        assert!(matches!(
            PathBatch::from_rows(vec![]),
            Err(SimulationError::InvalidPathCount(0))
        ));
    }

    #[test]
    fn test_from_rows_too_narrow_rejected() {
        assert!(matches!(
            PathBatch::from_rows(vec![vec![100.0]]),
            Err(SimulationError::TimeGridTooShort(1))
        ));
    }

    #[test]
    fn test_from_rows_ragged_rejected() {
        let result = PathBatch::from_rows(vec![vec![100.0, 101.0], vec![100.0]]);
        assert!(matches!(
            result,
            Err(SimulationError::RaggedRows {
                row: 1,
                expected: 2,
                actual: 1
            })
        ));
    }
}
