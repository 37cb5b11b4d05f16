//! Standard normal distribution functions.
//!
//! Provides `norm_cdf` and `norm_pdf` via the Abramowitz and Stegun erfc
//! approximation (formula 7.1.26, maximum error 1.5e-7).

/// 1 / sqrt(2 * pi)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Complementary error function approximation (Abramowitz-Stegun 7.1.26).
#[inline]
fn erfc_approx(x: f64) -> f64 {
    let abs_x = x.abs();

    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let t = 1.0 / (1.0 + p * abs_x);
    let poly = a1 + t * (a2 + t * (a3 + t * (a4 + t * a5)));
    let erfc_abs = t * poly * (-abs_x * abs_x).exp();

    if x < 0.0 {
        2.0 - erfc_abs
    } else {
        erfc_abs
    }
}

/// Standard normal cumulative distribution function.
///
/// Phi(x) = erfc(-x / sqrt(2)) / 2, accurate to about 1e-7 for all finite x.
///
/// # Examples
///
/// ```
/// use note_models::analytical::norm_cdf;
///
/// assert!((norm_cdf(0.0) - 0.5).abs() < 1e-7);
/// assert!((norm_cdf(1.96) - 0.975).abs() < 1e-3);
/// ```
#[inline]
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc_approx(-x / std::f64::consts::SQRT_2)
}

/// Standard normal probability density function.
#[inline]
pub fn norm_pdf(x: f64) -> f64 {
    FRAC_1_SQRT_2PI * (-0.5 * x * x).exp()
}
