//! Curve resampling via natural cubic spline interpolation.

mod spline;

pub use spline::{resample, CubicSpline};
