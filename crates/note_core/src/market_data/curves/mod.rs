//! Yield curve implementations.
//!
//! - [`YieldCurve`]: the curve capability consumed by pricing and calibration
//! - [`FlatCurve`]: constant continuously compounded rate
//! - [`InterpolatedCurve`]: log-linear interpolation over discount pillars
//! - [`Curve`]: static-dispatch wrapper over the concrete curves

mod curve_enum;
mod flat;
mod interpolated;
mod traits;

pub use curve_enum::Curve;
pub use flat::FlatCurve;
pub use interpolated::InterpolatedCurve;
pub use traits::YieldCurve;
