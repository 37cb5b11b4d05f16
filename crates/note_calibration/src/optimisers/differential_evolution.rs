//! Differential evolution (Storn and Price 1997), rand/1/bin variant.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::{
    clamp_to_bounds, validate_bounds, OptimisationOutcome, Optimizer, OptimiserError,
    ParameterBounds,
};

/// Bound-constrained differential evolution.
///
/// Global, population-based, derivative-free; the preset the calibration
/// engine reaches for first, since the Heston objective has plenty of
/// local structure for gradient methods to get stuck in.
///
/// The run is fully determined by the seed: two runs with identical
/// options and objective produce identical results.
///
/// # Examples
///
/// ```
/// use note_calibration::{DifferentialEvolution, Optimizer, ParameterBounds};
///
/// let bounds = [ParameterBounds::new(-1.0, 1.0), ParameterBounds::new(-1.0, 1.0)];
/// let outcome = DifferentialEvolution::default()
///     .minimise(|x| (x[0] - 0.2).powi(2) + (x[1] + 0.3).powi(2), &bounds)
///     .unwrap();
///
/// assert!((outcome.x[0] - 0.2).abs() < 1e-2);
/// assert!((outcome.x[1] + 0.3).abs() < 1e-2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifferentialEvolution {
    /// Generation budget.
    pub max_generations: usize,
    /// Population size (floored at dimension + 2, minimum 4).
    pub population_size: usize,
    /// Mutation factor F.
    pub mutation_factor: f64,
    /// Crossover probability CR.
    pub crossover_probability: f64,
    /// RNG seed.
    pub seed: u64,
    /// Generations without best-value improvement before stopping.
    pub max_stagnation: usize,
}

impl Default for DifferentialEvolution {
    fn default() -> Self {
        Self {
            max_generations: 150,
            population_size: 32,
            mutation_factor: 0.8,
            crossover_probability: 0.9,
            seed: 7,
            max_stagnation: 30,
        }
    }
}

impl Optimizer for DifferentialEvolution {
    fn minimise<F>(
        &self,
        objective: F,
        bounds: &[ParameterBounds],
    ) -> Result<OptimisationOutcome, OptimiserError>
    where
        F: Fn(&[f64]) -> f64,
    {
        validate_bounds(bounds)?;
        let dim = bounds.len();

        let pop_size = self.population_size.max(dim + 2);
        if pop_size < 4 {
            return Err(OptimiserError::PopulationTooSmall(pop_size));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut population: Vec<Vec<f64>> = Vec::with_capacity(pop_size);
        let mut values: Vec<f64> = Vec::with_capacity(pop_size);
        let mut evaluations = 0usize;

        for _ in 0..pop_size {
            let x: Vec<f64> = bounds
                .iter()
                .map(|b| b.min + rng.gen::<f64>() * b.width())
                .collect();
            let v = objective(&x);
            evaluations += 1;
            population.push(x);
            values.push(v);
        }

        let mut best_idx = values
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(idx, _)| idx)
            .unwrap_or(0);

        let mut iterations = 0usize;
        let mut stagnation = 0usize;
        let mut converged = false;

        for generation in 0..self.max_generations {
            iterations = generation + 1;
            let prev_best = values[best_idx];

            for i in 0..pop_size {
                let mut idxs: Vec<usize> = (0..pop_size).filter(|&k| k != i).collect();
                idxs.shuffle(&mut rng);
                let (a, b, c) = (idxs[0], idxs[1], idxs[2]);

                let mutant: Vec<f64> = (0..dim)
                    .map(|d| {
                        population[a][d]
                            + self.mutation_factor * (population[b][d] - population[c][d])
                    })
                    .collect();
                let mutant = clamp_to_bounds(bounds, &mutant);

                let j_rand = rng.gen_range(0..dim);
                let mut trial = population[i].clone();
                for (d, &m) in mutant.iter().enumerate() {
                    if d == j_rand || rng.gen::<f64>() <= self.crossover_probability {
                        trial[d] = m;
                    }
                }

                let trial_value = objective(&trial);
                evaluations += 1;
                if trial_value.is_finite() && trial_value < values[i] {
                    population[i] = trial;
                    values[i] = trial_value;
                    if trial_value < values[best_idx] {
                        best_idx = i;
                    }
                }
            }

            if (prev_best - values[best_idx]).abs() <= 1e-12 {
                stagnation += 1;
                if stagnation >= self.max_stagnation {
                    converged = true;
                    break;
                }
            } else {
                stagnation = 0;
            }
        }

        if !values[best_idx].is_finite() {
            return Err(OptimiserError::ObjectiveNotFinite);
        }

        Ok(OptimisationOutcome {
            x: population[best_idx].clone(),
            objective: values[best_idx],
            iterations,
            evaluations,
            converged,
        })
    }
}
