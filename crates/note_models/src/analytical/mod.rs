//! Analytical pricing formulas.
//!
//! - [`BlackScholes`]: closed-form European pricing with dividend yield
//! - [`heston_call_price`]: semi-closed-form Heston call via the Gatheral
//!   characteristic function, the model-implied pricing function consumed
//!   by calibration constraints
//! - [`implied_volatility`]: Black-Scholes implied volatility inversion

mod black_scholes;
mod distributions;
mod error;
mod heston;

pub use black_scholes::{implied_volatility, BlackScholes};
pub use distributions::{norm_cdf, norm_pdf};
pub use error::AnalyticalError;
pub use heston::heston_call_price;
