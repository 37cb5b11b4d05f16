//! Heston stochastic volatility model.
//!
//! The model is described by the SDE pair:
//! ```text
//! dS = (r - q) * S * dt + sqrt(V) * S * dW_S
//! dV = kappa * (theta - V) * dt + sigma * sqrt(V) * dW_V
//! E[dW_S * dW_V] = rho * dt
//! ```
//! where:
//! - S = asset level
//! - V = instantaneous variance
//! - kappa = mean-reversion speed
//! - theta = long-run variance
//! - sigma = volatility of variance (vol-of-vol)
//! - rho = correlation between the two Brownian motions
//!
//! ## Feller condition
//!
//! A sufficient condition for the variance to stay strictly positive:
//! ```text
//! 2 * kappa * theta >= sigma^2
//! ```
//! The condition is reported, not enforced: calibration is free to return
//! parameter sets that violate it, and the full-truncation discretisation
//! keeps the simulation well defined in that regime.
//!
//! ## Discretisation
//!
//! [`HestonProcess::evolve_step`] implements the full-truncation Euler
//! scheme (Lord, Koekkoek, van Dijk 2010): the raw variance state may go
//! negative between steps, but it is floored at zero wherever it enters a
//! drift or diffusion coefficient. The asset level advances in log space,
//! so simulated levels stay strictly positive.

use note_core::market_data::curves::{Curve, YieldCurve};
use note_core::market_data::MarketDataError;
use note_core::types::PricingError;
use thiserror::Error;

use super::stochastic::{StochasticProcess, TwoFactorState};

/// Heston model error type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HestonError {
    /// Spot level must be positive and finite.
    #[error("Invalid spot level: S0 = {0} (positive value required)")]
    InvalidSpot(f64),

    /// Initial variance must be positive.
    #[error("Invalid initial variance: v0 = {0} (positive value required)")]
    InvalidV0(f64),

    /// Mean-reversion speed must be positive.
    #[error("Invalid mean-reversion speed: kappa = {0} (positive value required)")]
    InvalidKappa(f64),

    /// Long-run variance must be positive.
    #[error("Invalid long-run variance: theta = {0} (positive value required)")]
    InvalidTheta(f64),

    /// Vol-of-vol must be positive.
    #[error("Invalid vol-of-vol: sigma = {0} (positive value required)")]
    InvalidSigma(f64),

    /// Correlation must lie strictly inside (-1, 1).
    #[error("Invalid correlation: rho = {0} (open interval (-1, 1) required)")]
    InvalidRho(f64),

    /// A parameter vector must have exactly five entries.
    #[error("Parameter vector has length {0}, expected 5 (v0, kappa, theta, sigma, rho)")]
    InvalidParameterVector(usize),
}

impl From<HestonError> for PricingError {
    fn from(err: HestonError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}

/// Validated Heston model parameters.
///
/// The canonical optimiser vector ordering is
/// `[v0, kappa, theta, sigma, rho]`, matching [`HestonParams::from_slice`]
/// and [`HestonParams::to_array`].
///
/// # Examples
///
/// ```
/// use note_models::models::heston::HestonParams;
///
/// let params = HestonParams::new(0.04, 1.5, 0.04, 0.3, -0.7).unwrap();
/// assert!(params.satisfies_feller());
///
/// // Round-trips through the optimiser vector representation.
/// let recovered = HestonParams::from_slice(&params.to_array()).unwrap();
/// assert_eq!(params, recovered);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HestonParams {
    /// Initial variance (v0 > 0).
    pub v0: f64,
    /// Mean-reversion speed (kappa > 0).
    pub kappa: f64,
    /// Long-run variance (theta > 0).
    pub theta: f64,
    /// Volatility of variance (sigma > 0).
    pub sigma: f64,
    /// Correlation between level and variance shocks (-1 < rho < 1).
    pub rho: f64,
}

impl HestonParams {
    /// Creates validated parameters.
    ///
    /// # Errors
    ///
    /// One of the `HestonError::Invalid*` variants when a parameter is
    /// outside its admissible range or not finite.
    pub fn new(v0: f64, kappa: f64, theta: f64, sigma: f64, rho: f64) -> Result<Self, HestonError> {
        let params = Self {
            v0,
            kappa,
            theta,
            sigma,
            rho,
        };
        params.validate()?;
        Ok(params)
    }

    /// Creates parameters from the canonical 5-entry optimiser vector.
    ///
    /// # Errors
    ///
    /// `HestonError::InvalidParameterVector` for a wrong length, otherwise
    /// the same validation as [`HestonParams::new`].
    pub fn from_slice(values: &[f64]) -> Result<Self, HestonError> {
        match values {
            [v0, kappa, theta, sigma, rho] => Self::new(*v0, *kappa, *theta, *sigma, *rho),
            _ => Err(HestonError::InvalidParameterVector(values.len())),
        }
    }

    /// Returns the canonical optimiser vector `[v0, kappa, theta, sigma, rho]`.
    pub fn to_array(self) -> [f64; 5] {
        [self.v0, self.kappa, self.theta, self.sigma, self.rho]
    }

    /// Validates the parameter set.
    pub fn validate(&self) -> Result<(), HestonError> {
        if !(self.v0.is_finite() && self.v0 > 0.0) {
            return Err(HestonError::InvalidV0(self.v0));
        }
        if !(self.kappa.is_finite() && self.kappa > 0.0) {
            return Err(HestonError::InvalidKappa(self.kappa));
        }
        if !(self.theta.is_finite() && self.theta > 0.0) {
            return Err(HestonError::InvalidTheta(self.theta));
        }
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(HestonError::InvalidSigma(self.sigma));
        }
        if !(self.rho.is_finite() && self.rho > -1.0 && self.rho < 1.0) {
            return Err(HestonError::InvalidRho(self.rho));
        }
        Ok(())
    }

    /// Checks the Feller condition `2 * kappa * theta >= sigma^2`.
    pub fn satisfies_feller(&self) -> bool {
        2.0 * self.kappa * self.theta >= self.sigma * self.sigma
    }

    /// Feller ratio `2 * kappa * theta / sigma^2` (>= 1 when satisfied).
    pub fn feller_ratio(&self) -> f64 {
        2.0 * self.kappa * self.theta / (self.sigma * self.sigma)
    }
}

/// A calibrated, simulatable Heston process.
///
/// The process handle owns the spot level, the model parameters, and the
/// two discount curves that determine its risk-neutral carry. It is the
/// object calibration returns and the path simulator consumes.
///
/// Re-parameterisation comes in two flavours:
/// - [`HestonProcess::with_params`] returns an immutable snapshot, which is
///   what the calibration objective uses per candidate vector so that
///   concurrent constraint evaluation never observes a half-applied update;
/// - [`HestonProcess::set_params`] mutates in place and is used once, to
///   install the optimiser's best vector into the returned process.
#[derive(Debug, Clone, PartialEq)]
pub struct HestonProcess {
    /// Spot level at time zero.
    spot: f64,
    /// Model parameters.
    params: HestonParams,
    /// Risk-free discounting curve.
    risk_free: Curve<f64>,
    /// Dividend yield curve.
    dividend: Curve<f64>,
}

impl HestonProcess {
    /// Constructs a process from spot, parameters, and curves.
    ///
    /// # Errors
    ///
    /// `HestonError::InvalidSpot` for a non-positive or non-finite spot;
    /// parameter validation errors are prevented by `HestonParams`'s own
    /// constructor but revalidated here for defence at the boundary.
    pub fn new(
        spot: f64,
        params: HestonParams,
        risk_free: Curve<f64>,
        dividend: Curve<f64>,
    ) -> Result<Self, HestonError> {
        if !(spot.is_finite() && spot > 0.0) {
            return Err(HestonError::InvalidSpot(spot));
        }
        params.validate()?;
        Ok(Self {
            spot,
            params,
            risk_free,
            dividend,
        })
    }

    /// Returns the spot level.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Returns the model parameters.
    #[inline]
    pub fn params(&self) -> &HestonParams {
        &self.params
    }

    /// Re-parameterises the process in place from an optimiser vector.
    ///
    /// # Errors
    ///
    /// Propagates `HestonParams::from_slice` validation failures; the
    /// process is left unchanged on error.
    pub fn set_params(&mut self, values: &[f64]) -> Result<(), HestonError> {
        self.params = HestonParams::from_slice(values)?;
        Ok(())
    }

    /// Returns an immutable snapshot of this process with different
    /// parameters.
    pub fn with_params(&self, params: HestonParams) -> Self {
        Self {
            params,
            ..self.clone()
        }
    }

    /// Correlates two independent standard normals via Cholesky:
    /// `dW_S = z1`, `dW_V = rho * z1 + sqrt(1 - rho^2) * z2`.
    #[inline]
    fn correlate(&self, z1: f64, z2: f64) -> (f64, f64) {
        let rho = self.params.rho;
        (z1, rho * z1 + (1.0 - rho * rho).sqrt() * z2)
    }
}

impl StochasticProcess for HestonProcess {
    type State = TwoFactorState;

    fn initial_state(&self) -> TwoFactorState {
        TwoFactorState {
            level: self.spot,
            variance: self.params.v0,
        }
    }

    fn brownian_dim(&self) -> usize {
        2
    }

    /// Forward carry r - q over `[t0, t1]` read off the two curves.
    fn step_drift(&self, t0: f64, t1: f64) -> Result<f64, MarketDataError> {
        let r = self.risk_free.forward_rate(t0, t1)?;
        let q = self.dividend.forward_rate(t0, t1)?;
        Ok(r - q)
    }

    /// Full-truncation Euler step.
    ///
    /// The floored variance `max(V, 0)` enters every coefficient; the raw
    /// state keeps the unfloored value so the scheme retains its bias
    /// properties. The level advances in log space and stays positive.
    fn evolve_step(&self, state: TwoFactorState, dt: f64, drift: f64, dz: &[f64]) -> TwoFactorState {
        debug_assert_eq!(dz.len(), 2);
        let z1 = dz.first().copied().unwrap_or(0.0);
        let z2 = dz.get(1).copied().unwrap_or(0.0);
        let (dw_s, dw_v) = self.correlate(z1, z2);

        let kappa = self.params.kappa;
        let theta = self.params.theta;
        let sigma = self.params.sigma;

        let v_pos = state.variance.max(0.0);
        let sqrt_v_dt = (v_pos * dt).sqrt();

        let variance = state.variance + kappa * (theta - v_pos) * dt + sigma * sqrt_v_dt * dw_v;
        let level = state.level * ((drift - 0.5 * v_pos) * dt + sqrt_v_dt * dw_s).exp();

        TwoFactorState { level, variance }
    }

    fn level(state: &TwoFactorState) -> f64 {
        state.level
    }

    fn model_name() -> &'static str {
        "Heston"
    }
}
