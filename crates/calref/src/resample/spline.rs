//! Natural cubic spline over a coarsely sampled reference curve.
//!
//! Reference curves in calibration tables carry far fewer samples than
//! the pipeline's per-pixel wavelength grid, so each target abscissa
//! gets a spline-interpolated value. Targets beyond the reference
//! range are extrapolated with the boundary cubic; nothing is clamped.

use crate::error::{CalrefError, Result};

/// A natural cubic spline fitted over reference knots.
///
/// Knots are assumed sorted by x; behavior with unsorted or duplicate
/// abscissas is unspecified, as with the reference data that feeds it.
/// With exactly two knots the spline degenerates to the straight line
/// through them.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivatives at each knot; zero at both ends (natural).
    y2: Vec<f64>,
}

impl CubicSpline {
    /// Fit a natural cubic spline through `(xs[i], ys[i])`.
    ///
    /// Fails with [`CalrefError::InsufficientData`] for fewer than two
    /// knots. `xs` and `ys` must be the same length.
    pub fn natural(xs: &[f64], ys: &[f64]) -> Result<Self> {
        assert_eq!(xs.len(), ys.len(), "knot abscissas and ordinates must pair up");
        let n = xs.len();
        if n < 2 {
            return Err(CalrefError::InsufficientData { got: n });
        }

        // Tridiagonal solve for the second derivatives, natural
        // boundary conditions (y2 = 0 at both ends).
        let mut y2 = vec![0.0; n];
        let mut u = vec![0.0; n];
        for i in 1..n - 1 {
            let sig = (xs[i] - xs[i - 1]) / (xs[i + 1] - xs[i - 1]);
            let p = sig * y2[i - 1] + 2.0;
            y2[i] = (sig - 1.0) / p;
            u[i] = (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i])
                - (ys[i] - ys[i - 1]) / (xs[i] - xs[i - 1]);
            u[i] = (6.0 * u[i] / (xs[i + 1] - xs[i - 1]) - sig * u[i - 1]) / p;
        }
        for k in (0..n - 1).rev() {
            y2[k] = y2[k] * y2[k + 1] + u[k];
        }

        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            y2,
        })
    }

    /// Number of knots.
    pub fn knot_count(&self) -> usize {
        self.xs.len()
    }

    /// Evaluate the spline at `x`.
    ///
    /// Outside the knot range the boundary interval's cubic is
    /// extended.
    pub fn eval(&self, x: f64) -> f64 {
        let n = self.xs.len();
        // Interval containing x, clamped to [0, n-2] so out-of-range
        // targets use the boundary cubic.
        let klo = self
            .xs
            .partition_point(|&xi| xi < x)
            .saturating_sub(1)
            .min(n - 2);
        let khi = klo + 1;

        let h = self.xs[khi] - self.xs[klo];
        if h == 0.0 {
            return self.ys[klo];
        }
        let a = (self.xs[khi] - x) / h;
        let b = (x - self.xs[klo]) / h;
        a * self.ys[klo]
            + b * self.ys[khi]
            + ((a * a * a - a) * self.y2[klo] + (b * b * b - b) * self.y2[khi]) * h * h / 6.0
    }

    /// Evaluate the spline at every target abscissa.
    pub fn resample(&self, targets: &[f64]) -> Vec<f64> {
        targets.iter().map(|&x| self.eval(x)).collect()
    }
}

/// Fit and evaluate in one step: interpolate `(xs_ref, ys_ref)` at
/// every element of `xs_target`.
pub fn resample(xs_ref: &[f64], ys_ref: &[f64], xs_target: &[f64]) -> Result<Vec<f64>> {
    let spline = CubicSpline::natural(xs_ref, ys_ref)?;
    Ok(spline.resample(xs_target))
}
