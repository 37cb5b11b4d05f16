//! The calibration engine: surface in, calibrated process out.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use note_core::market_data::MarketEnvironment;
use note_models::models::heston::{HestonParams, HestonProcess};

use crate::constraints::OptionConstraint;
use crate::error::CalibrationError;
use crate::optimisers::{Optimizer, ParameterBounds};
use crate::surface::VolatilitySurface;

/// Number of calibrated parameters (v0, kappa, theta, sigma, rho).
pub const PARAM_COUNT: usize = 5;

/// Calibrates Heston parameters to an implied-volatility surface.
///
/// One engine per market environment. Each call to
/// [`CalibrationEngine::calibrate`] is self-contained: constraints are
/// built from the surface, the injected optimiser minimises the
/// root-sum-of-squares of the relative price errors, and the calibrated
/// process is returned re-parameterised with the best vector.
///
/// # Snapshot semantics
///
/// The objective never mutates shared state. For every candidate vector it
/// takes an immutable parameter snapshot of the base process and evaluates
/// all constraints against that snapshot (in parallel with the `parallel`
/// feature). Candidate evaluations therefore cannot interleave, whatever
/// the optimiser does.
#[derive(Debug, Clone)]
pub struct CalibrationEngine {
    env: MarketEnvironment,
}

impl CalibrationEngine {
    /// Creates an engine for one market environment.
    pub fn new(env: MarketEnvironment) -> Self {
        Self { env }
    }

    /// Returns the engine's environment.
    pub fn environment(&self) -> &MarketEnvironment {
        &self.env
    }

    /// Fits the model to the surface.
    ///
    /// # Arguments
    ///
    /// * `initial` - Starting parameter guess (seeds the base process; how
    ///   much it matters depends on the optimiser preset)
    /// * `surface` - The quoted surface; every cell becomes one constraint
    /// * `bounds` - Per-parameter `[lo, hi]` ranges, length 5, in the
    ///   canonical order v0, kappa, theta, sigma, rho
    /// * `optimizer` - The injected minimisation capability
    ///
    /// # Errors
    ///
    /// - `CalibrationError::BoundsDimension` / `InvalidBound` for malformed
    ///   bounds
    /// - `CalibrationError::ExpiredQuote` when a surface expiry is not
    ///   after the valuation date
    /// - `CalibrationError::Optimiser` when the optimiser itself fails
    /// - `CalibrationError::Numerical` when the best vector is non-finite,
    ///   outside the admissible parameter domain, or never achieved a
    ///   finite objective
    pub fn calibrate<O: Optimizer>(
        &self,
        initial: HestonParams,
        surface: &VolatilitySurface,
        bounds: &[ParameterBounds],
        optimizer: &O,
    ) -> Result<(HestonProcess, HestonParams), CalibrationError> {
        if bounds.len() != PARAM_COUNT {
            return Err(CalibrationError::BoundsDimension(bounds.len()));
        }
        for (index, b) in bounds.iter().enumerate() {
            if !b.is_valid() {
                return Err(CalibrationError::InvalidBound {
                    index,
                    lower: b.min,
                    upper: b.max,
                });
            }
        }

        let constraints: Vec<OptionConstraint> = surface
            .quotes()
            .map(|(expiry, strike, vol)| OptionConstraint::from_quote(&self.env, expiry, strike, vol))
            .collect::<Result<_, _>>()?;

        let base = HestonProcess::new(
            self.env.spot(),
            initial,
            self.env.risk_free().clone(),
            self.env.dividend().clone(),
        )?;

        let objective = |x: &[f64]| -> f64 {
            let params = match HestonParams::from_slice(x) {
                Ok(p) => p,
                Err(_) => return f64::MAX,
            };
            let snapshot = base.with_params(params);
            let ss = sum_squared_errors(&constraints, &snapshot);
            if ss.is_finite() {
                ss.sqrt()
            } else {
                f64::MAX
            }
        };

        let outcome = optimizer.minimise(objective, bounds)?;

        if outcome.objective >= f64::MAX || !outcome.objective.is_finite() {
            return Err(CalibrationError::Numerical(
                "optimiser never reached a finite objective".to_string(),
            ));
        }
        let params = HestonParams::from_slice(&outcome.x)
            .map_err(|e| CalibrationError::Numerical(e.to_string()))?;

        tracing::debug!(
            objective = outcome.objective,
            iterations = outcome.iterations,
            evaluations = outcome.evaluations,
            converged = outcome.converged,
            "Heston calibration finished"
        );
        if !params.satisfies_feller() {
            tracing::warn!(
                feller_ratio = params.feller_ratio(),
                "calibrated parameters violate the Feller condition; the \
                 full-truncation scheme will floor the variance at zero"
            );
        }

        let mut process = base;
        process.set_params(&outcome.x)?;
        Ok((process, params))
    }
}

/// Sum of squared constraint residuals against one parameter snapshot.
///
/// A failing or non-finite constraint poisons the sum with NaN, which the
/// objective converts into `f64::MAX` for the optimiser to route around.
fn sum_squared_errors(constraints: &[OptionConstraint], snapshot: &HestonProcess) -> f64 {
    let square = |c: &OptionConstraint| {
        c.calibration_error(snapshot)
            .map(|e| e * e)
            .unwrap_or(f64::NAN)
    };

    #[cfg(feature = "parallel")]
    {
        constraints.par_iter().map(square).sum()
    }
    #[cfg(not(feature = "parallel"))]
    {
        constraints.iter().map(square).sum()
    }
}
