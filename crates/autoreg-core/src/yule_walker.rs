//! AR coefficients from the Yule-Walker equations.
//!
//! The zero-lag equation is dropped: the first column of the autocovariance
//! matrix (minus its first entry) becomes the right-hand side, and the matrix
//! without its first row and column becomes the left-hand side. The solution
//! fills every AR coefficient except `phi(0,0,0)`, which is zero.
use nalgebra::DVector;
use tracing::{debug, error};

use crate::error::{AutoregError, Result};
use crate::grid::Grid3;
use crate::matrix::generate_ac_matrix;
use crate::solver::{LuSolver, SymmetricSolver};

/// Fit AR coefficients to `acf` with the default solver and check stationarity.
pub fn compute_ar_coefs(acf: &Grid3) -> Result<Grid3> {
    compute_ar_coefs_with(acf, &LuSolver)
}

/// Fit AR coefficients to `acf` with the given solver and check stationarity.
pub fn compute_ar_coefs_with<S: SymmetricSolver + ?Sized>(acf: &Grid3, solver: &S) -> Result<Grid3> {
    let m = acf.len().saturating_sub(1);
    let mut phi = Grid3::zeros(acf.size);
    if m == 0 {
        return Ok(phi);
    }

    let acm = generate_ac_matrix(acf);
    let rhs = DVector::from_iterator(m, acm.column(0).iter().skip(1).copied());
    let lhs = acm.view((1, 1), (m, m)).into_owned();
    debug!(unknowns = m, "solving Yule-Walker system");

    let solution = solver.solve_symmetric(lhs, rhs)?;
    phi.data[1..].copy_from_slice(solution.as_slice());

    check_stationary(&phi)?;
    Ok(phi)
}

/// True when every coefficient is finite and at most 1 in magnitude.
pub fn is_stationary(phi: &Grid3) -> bool {
    phi.data.iter().all(|v| v.abs() <= 1.0)
}

/// Fail with [`AutoregError::NonStationary`] after logging every offending coefficient.
pub fn check_stationary(phi: &Grid3) -> Result<()> {
    if is_stationary(phi) {
        return Ok(());
    }
    let mut count = 0;
    let mut max_abs = 0.0f64;
    for (i, &v) in phi.data.iter().enumerate() {
        if !(v.abs() <= 1.0) {
            let (t, x, y) = phi.coords(i);
            error!(t, x, y, phi = v, shape = %phi.size, "AR coefficient out of range");
            count += 1;
            max_abs = max_abs.max(v.abs());
        }
    }
    Err(AutoregError::NonStationary { count, max_abs })
}

/// Residual variance of the fitted model: `acf(0,0,0) − Σ(phi ⊙ acf)`.
///
/// Negative or non-finite values mean the ACF and the coefficients are
/// inconsistent. Both grids must be non-empty and of the same shape.
pub fn white_noise_variance(phi: &Grid3, acf: &Grid3) -> Result<f64> {
    if acf.is_empty() {
        return Err(AutoregError::invalid("acf", "empty grid"));
    }
    if phi.size != acf.size {
        return Err(AutoregError::invalid("ar_coefs", format!("shape {} differs from ACF {}", phi.size, acf.size)));
    }
    let var = acf.data[0] - phi.dot(acf);
    if !(var >= 0.0 && var.is_finite()) {
        return Err(AutoregError::NegativeVariance(var));
    }
    Ok(var)
}
