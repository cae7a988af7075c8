//! Dense symmetric linear solve behind a trait seam.
//!
//! The Yule-Walker code only needs "solve this symmetric system or tell me
//! which pivot vanished"; [`LuSolver`] provides that on top of nalgebra.
use nalgebra::{DMatrix, DVector};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The factorization hit an exactly-zero pivot at this (0-based) position.
    #[error("pivot {pivot} is zero")]
    Singular { pivot: usize },
}

pub trait SymmetricSolver {
    /// Solve `matrix · x = rhs` for a symmetric `matrix`.
    fn solve_symmetric(&self, matrix: DMatrix<f64>, rhs: DVector<f64>) -> Result<DVector<f64>, SolveError>;
}

/// LU factorization with partial pivoting.
#[derive(Debug, Clone, Copy, Default)]
pub struct LuSolver;

impl SymmetricSolver for LuSolver {
    fn solve_symmetric(&self, matrix: DMatrix<f64>, rhs: DVector<f64>) -> Result<DVector<f64>, SolveError> {
        debug_assert!(matrix.is_square());
        debug_assert_eq!(matrix.nrows(), rhs.len());

        let lu = matrix.lu();
        let u = lu.u();
        if let Some(pivot) = (0..u.nrows()).find(|&i| u[(i, i)] == 0.0) {
            return Err(SolveError::Singular { pivot });
        }
        lu.solve(&rhs).ok_or(SolveError::Singular { pivot: u.nrows().saturating_sub(1) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn solves_symmetric_system() {
        let m = DMatrix::from_row_slice(3, 3, &[4.0, 1.0, 2.0, 1.0, 3.0, 0.5, 2.0, 0.5, 5.0]);
        let x = DVector::from_vec(vec![1.0, -2.0, 0.5]);
        let rhs = &m * &x;
        let got = LuSolver.solve_symmetric(m, rhs).unwrap();
        for i in 0..3 {
            assert_relative_eq!(got[i], x[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn all_ones_matrix_is_singular() {
        let m = DMatrix::from_element(3, 3, 1.0);
        let rhs = DVector::from_element(3, 1.0);
        assert_eq!(LuSolver.solve_symmetric(m, rhs), Err(SolveError::Singular { pivot: 1 }));
    }

    #[test]
    fn zero_matrix_fails_at_first_pivot() {
        let m = DMatrix::zeros(2, 2);
        let rhs = DVector::zeros(2);
        assert_eq!(LuSolver.solve_symmetric(m, rhs), Err(SolveError::Singular { pivot: 0 }));
    }
}
