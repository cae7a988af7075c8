//! Model autocovariance function.
//!
//! Exponentially decaying cosine, separable along t, x and y:
//! `gamma · exp(−alpha·(t·dt + x·dx + y·dy)) · cos(beta·t·dt) · cos(beta·x·dx) · cos(beta·y·dy)`.
use serde::{Deserialize, Serialize};

use crate::grid::{Delta3, Grid3, Size3};

/// Shape parameters of the model ACF.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcfParams {
    /// Exponential decay rate.
    pub alpha: f64,
    /// Oscillation frequency.
    pub beta: f64,
    /// Amplitude, equal to the ACF at zero lag.
    pub gamma: f64,
}

impl Default for AcfParams {
    fn default() -> Self {
        Self { alpha: 0.06, beta: 0.8, gamma: 1.0 }
    }
}

/// Evaluate the model ACF on the lag grid `[0, size.t) × [0, size.x) × [0, size.y)`.
pub fn approx_acf(params: &AcfParams, delta: &Delta3, size: Size3) -> Grid3 {
    let AcfParams { alpha, beta, gamma } = *params;
    Grid3::from_fn(size, |t, x, y| {
        let (lt, lx, ly) = (t as f64 * delta.t, x as f64 * delta.x, y as f64 * delta.y);
        gamma
            * (-alpha * (lt + lx + ly)).exp()
            * (beta * lt).cos()
            * (beta * lx).cos()
            * (beta * ly).cos()
    })
}

/// Variance of the process described by `acf`, i.e. its zero-lag value.
///
/// # Panics
/// Panics if `acf` is empty. Grids built by [`approx_acf`] from a validated
/// configuration never are.
#[inline]
pub fn acf_variance(acf: &Grid3) -> f64 {
    acf.data[0]
}
