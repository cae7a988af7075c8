//! Autocovariance matrix of the Yule-Walker system.
//!
//! For an ACF of shape `(n0, n1, n2)` the matrix is `N × N` with
//! `N = n0·n1·n2`. Row and column `a` stand for the lag triple at linear
//! index `a` of the ACF (t slowest, y fastest), and
//!
//! ```text
//! M[a][b] = acf(|ta − tb|, |xa − xb|, |ya − yb|)
//! ```
//!
//! Seen from the outside in, this is an `n0 × n0` block-Toeplitz matrix whose
//! blocks are `n1 × n1` block-Toeplitz matrices of `n2 × n2` Toeplitz blocks.
//! The final size is known up front, so every entry is written directly into
//! one preallocated buffer.
use nalgebra::DMatrix;

use crate::grid::Grid3;

/// Build the full `(n0·n1·n2)²` autocovariance matrix from `acf`.
pub fn generate_ac_matrix(acf: &Grid3) -> DMatrix<f64> {
    let n = acf.len();
    let mut data = vec![0.0f64; n * n];

    // nalgebra is column-major; the matrix is symmetric so column `b` is also row `b`.
    #[cfg(feature = "threading")]
    {
        use rayon::prelude::*;
        data.par_chunks_mut(n.max(1))
            .enumerate()
            .for_each(|(b, col)| fill_column(acf, b, col));
    }
    #[cfg(not(feature = "threading"))]
    for (b, col) in data.chunks_mut(n.max(1)).enumerate() {
        fill_column(acf, b, col);
    }

    DMatrix::from_vec(n, n, data)
}

fn fill_column(acf: &Grid3, b: usize, col: &mut [f64]) {
    let (tb, xb, yb) = acf.coords(b);
    for (a, v) in col.iter_mut().enumerate() {
        let (ta, xa, ya) = acf.coords(a);
        *v = acf.get(ta.abs_diff(tb), xa.abs_diff(xb), ya.abs_diff(yb));
    }
}
