//! Full eigendecomposition of a graph Laplacian.
//!
//! The decomposition is computed densely with `faer`'s self-adjoint solver and
//! then canonicalized so that the result is reproducible across runs and
//! platforms:
//!
//! 1. Eigenpairs are sorted by ascending eigenvalue. The sort is stable, so
//!    exactly tied eigenvalues keep the solver's original order.
//! 2. Each eigenvector is negated if needed so that its first entry of
//!    non-negligible magnitude is nonnegative. This removes the ±1 ambiguity
//!    inherent to eigenvectors.
//!
//! The cost is O(N³) time and O(N²) memory. For large graphs prefer the
//! Chebyshev path in [`super::chebyshev`].

use crate::{
    error::{GspError, dimension_mismatch, domain},
    matrix::{is_symmetric, to_dense},
};
use faer::{Mat, Side, sparse::SparseColMat};

/// Vertex count above which a full decomposition is reported as expensive.
pub const EIGEN_SIZE_WARNING: usize = 3000;

/// Relative tolerance used when checking that the Laplacian is symmetric.
pub const SYMMETRY_TOLERANCE: f64 = 1e-10;

/// Entries at or below this magnitude are skipped when fixing the sign of an eigenvector.
pub const SIGN_TOLERANCE: f64 = 1e-10;

/// Sorted, sign-canonical eigenpairs of a symmetric matrix.
#[derive(Debug, Clone)]
pub struct EigenPairs {
    /// Eigenvalues in ascending order.
    pub eigenvalues: Vec<f64>,
    /// Orthonormal eigenvectors; column `k` pairs with `eigenvalues[k]`.
    pub eigenvectors: Mat<f64>,
}

/// Computes the full, canonicalized eigendecomposition of the Laplacian `l`.
///
/// # Errors
/// * `DimensionMismatch` if `l` is not square.
/// * `Domain` if `l` is not symmetric.
/// * `Eigendecomposition` if the dense solver fails to converge.
pub fn full_eigen(l: &SparseColMat<usize, f64>) -> Result<EigenPairs, GspError> {
    let n = l.nrows();
    if l.ncols() != n {
        return Err(dimension_mismatch("Laplacian columns", n, l.ncols()));
    }
    if n > EIGEN_SIZE_WARNING {
        log::warn!(
            "Performing a full eigendecomposition of a {n}x{n} Laplacian; this may take some time. \
             Consider Chebyshev filtering instead."
        );
    }

    let dense = to_dense(l);
    if !is_symmetric(dense.as_ref(), SYMMETRY_TOLERANCE) {
        return Err(domain(
            "the Laplacian is not symmetric; a real orthonormal Fourier basis requires a symmetric operator.",
        ));
    }

    let evd = dense.as_ref().self_adjoint_eigen(Side::Lower)?;
    let values = evd.S();
    let vectors = evd.U();

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let eigenvalues: Vec<f64> = order.iter().map(|&k| values[k]).collect();
    let mut eigenvectors = Mat::from_fn(n, n, |i, j| vectors[(i, order[j])]);
    canonicalize_signs(&mut eigenvectors);

    Ok(EigenPairs {
        eigenvalues,
        eigenvectors,
    })
}

/// Flips every column whose first non-negligible entry is negative.
pub(crate) fn canonicalize_signs(u: &mut Mat<f64>) {
    let (nrows, ncols) = (u.nrows(), u.ncols());
    for j in 0..ncols {
        let pivot = (0..nrows).map(|i| u[(i, j)]).find(|v| v.abs() > SIGN_TOLERANCE);
        if matches!(pivot, Some(p) if p < 0.0) {
            for i in 0..nrows {
                let v = u[(i, j)];
                u[(i, j)] = -v;
            }
        }
    }
}

/// Returns the largest absolute entry of `u`.
pub(crate) fn max_abs(u: &Mat<f64>) -> f64 {
    let mut mu = 0.0f64;
    for j in 0..u.ncols() {
        for i in 0..u.nrows() {
            mu = mu.max(u[(i, j)].abs());
        }
    }
    mu
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GspErrorKind;
    use faer::{mat, sparse::Triplet};

    fn sparse(dense: &Mat<f64>) -> SparseColMat<usize, f64> {
        let mut triplets = Vec::new();
        for j in 0..dense.ncols() {
            for i in 0..dense.nrows() {
                if dense[(i, j)] != 0.0 {
                    triplets.push(Triplet {
                        row: i,
                        col: j,
                        val: dense[(i, j)],
                    });
                }
            }
        }
        SparseColMat::try_new_from_triplets(dense.nrows(), dense.ncols(), &triplets).unwrap()
    }

    #[test]
    fn test_eigenvalues_ascending_and_reconstruct() {
        let a: Mat<f64> = mat![[2.0, -1.0, 0.0], [-1.0, 2.0, -1.0], [0.0, -1.0, 2.0]];
        let pairs = full_eigen(&sparse(&a)).unwrap();

        assert!(pairs.eigenvalues.windows(2).all(|w| w[0] <= w[1]));

        let u = &pairs.eigenvectors;
        let d = Mat::from_fn(3, 3, |i, j| if i == j { pairs.eigenvalues[i] } else { 0.0 });
        let reconstructed = u * &d * u.as_ref().transpose();
        assert!((&reconstructed - &a).norm_l2() < 1e-12);
    }

    #[test]
    fn test_first_significant_entry_is_nonnegative() {
        let a: Mat<f64> = mat![[1.0, -1.0, 0.0], [-1.0, 2.0, -1.0], [0.0, -1.0, 1.0]];
        let pairs = full_eigen(&sparse(&a)).unwrap();
        for j in 0..3 {
            let first = (0..3)
                .map(|i| pairs.eigenvectors[(i, j)])
                .find(|v| v.abs() > SIGN_TOLERANCE)
                .unwrap();
            assert!(first > 0.0);
        }
    }

    #[test]
    fn test_canonicalize_flips_negative_columns() {
        let mut u: Mat<f64> = mat![[0.0, -0.6], [-1.0, 0.8]];
        canonicalize_signs(&mut u);
        assert_eq!(u, mat![[0.0, 0.6], [1.0, -0.8]]);
        assert_eq!(max_abs(&u), 1.0);
    }

    #[test]
    fn test_asymmetric_matrix_is_rejected() {
        let a: Mat<f64> = mat![[1.0, -1.0], [0.0, 0.0]];
        let err = full_eigen(&sparse(&a)).unwrap_err();
        assert!(matches!(err.kind(), GspErrorKind::Domain(_)));
    }
}
