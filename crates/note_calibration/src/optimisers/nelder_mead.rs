//! Nelder-Mead simplex direct search (Nelder and Mead 1965).

use super::{
    clamp_to_bounds, validate_bounds, OptimisationOutcome, Optimizer, OptimiserError,
    ParameterBounds,
};

/// Bound-constrained Nelder-Mead simplex.
///
/// Local and derivative-free. Starts from `initial` when supplied,
/// otherwise from the midpoint of the bounds; every probed vertex is
/// clamped back into the box.
///
/// # Examples
///
/// ```
/// use note_calibration::{NelderMead, Optimizer, ParameterBounds};
///
/// let bounds = [ParameterBounds::new(-1.0, 1.0), ParameterBounds::new(-1.0, 1.0)];
/// let nm = NelderMead {
///     initial: Some(vec![0.9, 0.9]),
///     ..NelderMead::default()
/// };
/// let outcome = nm
///     .minimise(|x| (x[0] - 0.25).powi(2) + (x[1] + 0.4).powi(2), &bounds)
///     .unwrap();
///
/// assert!((outcome.x[0] - 0.25).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NelderMead {
    /// Iteration budget.
    pub max_iterations: usize,
    /// Initial simplex step as a fraction of each bound's width.
    pub initial_step: f64,
    /// Reflection coefficient.
    pub reflection: f64,
    /// Expansion coefficient.
    pub expansion: f64,
    /// Contraction coefficient.
    pub contraction: f64,
    /// Shrink coefficient.
    pub shrink: f64,
    /// Convergence tolerance on simplex spread and diameter.
    pub tolerance: f64,
    /// Starting point; bounds midpoint when `None`.
    pub initial: Option<Vec<f64>>,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            max_iterations: 400,
            initial_step: 0.08,
            reflection: 1.0,
            expansion: 2.0,
            contraction: 0.5,
            shrink: 0.5,
            tolerance: 1e-8,
            initial: None,
        }
    }
}

impl Optimizer for NelderMead {
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

        let x0 = match &self.initial {
            Some(x) => {
                if x.len() != dim {
                    return Err(OptimiserError::DimensionMismatch {
                        expected: dim,
                        actual: x.len(),
                    });
                }
                clamp_to_bounds(bounds, x)
            }
            None => bounds.iter().map(|b| b.midpoint()).collect(),
        };

        let mut evaluations = 0usize;
        let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(dim + 1);
        let mut values: Vec<f64> = Vec::with_capacity(dim + 1);

        simplex.push(x0.clone());
        values.push(objective(&x0));
        evaluations += 1;

        for d in 0..dim {
            let mut x = x0.clone();
            let step = bounds[d].width().abs() * self.initial_step.max(1e-4);
            x[d] = (x[d] + step).min(bounds[d].max);
            if (x[d] - x0[d]).abs() < 1e-14 {
                x[d] = (x[d] - step).max(bounds[d].min);
            }
            values.push(objective(&x));
            evaluations += 1;
            simplex.push(x);
        }

        let mut iterations = 0usize;
        let mut converged = false;

        for iter in 0..self.max_iterations {
            iterations = iter + 1;

            let mut order: Vec<usize> = (0..simplex.len()).collect();
            order.sort_by(|&i, &j| values[i].total_cmp(&values[j]));
            simplex = order.iter().map(|&i| simplex[i].clone()).collect();
            values = order.iter().map(|&i| values[i]).collect();

            let spread = (values[dim] - values[0]).abs();
            let centroid: Vec<f64> = (0..dim)
                .map(|d| simplex.iter().take(dim).map(|x| x[d]).sum::<f64>() / dim as f64)
                .collect();
            let diameter = simplex
                .iter()
                .map(|x| {
                    x.iter()
                        .zip(&centroid)
                        .map(|(a, b)| (a - b) * (a - b))
                        .sum::<f64>()
                        .sqrt()
                })
                .fold(0.0_f64, f64::max);

            if spread <= self.tolerance && diameter <= self.tolerance {
                converged = true;
                break;
            }

            // Reflect the worst vertex through the centroid.
            let xr: Vec<f64> = (0..dim)
                .map(|d| centroid[d] + self.reflection * (centroid[d] - simplex[dim][d]))
                .collect();
            let xr = clamp_to_bounds(bounds, &xr);
            let fr = objective(&xr);
            evaluations += 1;

            if fr < values[0] {
                let xe: Vec<f64> = (0..dim)
                    .map(|d| centroid[d] + self.expansion * (xr[d] - centroid[d]))
                    .collect();
                let xe = clamp_to_bounds(bounds, &xe);
                let fe = objective(&xe);
                evaluations += 1;

                if fe < fr {
                    simplex[dim] = xe;
                    values[dim] = fe;
                } else {
                    simplex[dim] = xr;
                    values[dim] = fr;
                }
                continue;
            }

            if fr < values[dim - 1] {
                simplex[dim] = xr;
                values[dim] = fr;
                continue;
            }

            let xc: Vec<f64> = (0..dim)
                .map(|d| centroid[d] + self.contraction * (simplex[dim][d] - centroid[d]))
                .collect();
            let xc = clamp_to_bounds(bounds, &xc);
            let fc = objective(&xc);
            evaluations += 1;

            if fc < values[dim] {
                simplex[dim] = xc;
                values[dim] = fc;
                continue;
            }

            // Shrink everything towards the best vertex.
            for i in 1..=dim {
                for d in 0..dim {
                    simplex[i][d] =
                        simplex[0][d] + self.shrink * (simplex[i][d] - simplex[0][d]);
                }
                simplex[i] = clamp_to_bounds(bounds, &simplex[i]);
                values[i] = objective(&simplex[i]);
                evaluations += 1;
            }
        }

        let best = values
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(idx, _)| idx)
            .unwrap_or(0);

        if !values[best].is_finite() {
            return Err(OptimiserError::ObjectiveNotFinite);
        }

        Ok(OptimisationOutcome {
            x: simplex[best].clone(),
            objective: values[best],
            iterations,
            evaluations,
            converged,
        })
    }
}
