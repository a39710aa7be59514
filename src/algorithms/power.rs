//! Cheap estimation of the spectral radius of a sparse Laplacian.
//!
//! Chebyshev filtering needs an interval `[0, lmax]` that contains the whole
//! spectrum, but computing `lmax` exactly would require the eigendecomposition
//! the polynomial path exists to avoid. Instead, a few power iterations on the
//! sparse Laplacian give a Rayleigh-quotient estimate, which is inflated by a
//! small margin and capped by the Gershgorin bound.

use crate::matrix::sparse_apply;
use faer::{Mat, sparse::SparseColMat};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Maximum number of power iterations.
pub const POWER_ITERATIONS: usize = 200;

/// Relative change of the Rayleigh quotient below which the iteration stops.
pub const POWER_TOLERANCE: f64 = 1e-9;

/// Multiplicative safety margin applied to the converged estimate.
pub const LMAX_MARGIN: f64 = 1.01;

/// Fixed seed so that the estimate is reproducible.
const START_SEED: u64 = 42;

/// Upper bound on the spectral radius: the largest absolute row sum of `l`.
pub fn gershgorin_bound(l: &SparseColMat<usize, f64>) -> f64 {
    let mut row_abs = vec![0.0; l.nrows()];
    for triplet in l.triplet_iter() {
        row_abs[triplet.row] += triplet.val.abs();
    }
    row_abs.into_iter().fold(0.0, f64::max)
}

/// Estimates the largest eigenvalue of the symmetric positive semi-definite `l`.
///
/// The cost is O(`POWER_ITERATIONS` · nnz(`l`)). The result is never larger
/// than [`gershgorin_bound`], and is `0.0` for the zero operator.
pub fn estimate_lmax(l: &SparseColMat<usize, f64>) -> f64 {
    let n = l.nrows();
    let bound = gershgorin_bound(l);
    if n == 0 || bound == 0.0 {
        return 0.0;
    }

    let mut rng = StdRng::seed_from_u64(START_SEED);
    let mut x = Mat::from_fn(n, 1, |_, _| rng.random::<f64>() - 0.5);
    let norm = x.norm_l2();
    x = Mat::from_fn(n, 1, |i, _| x[(i, 0)] / norm);

    let mut lambda = 0.0;
    for iteration in 0..POWER_ITERATIONS {
        let y = sparse_apply(l, x.as_ref());
        let rayleigh: f64 = (0..n).map(|i| x[(i, 0)] * y[(i, 0)]).sum();
        let y_norm = y.norm_l2();
        if y_norm == 0.0 {
            break;
        }
        x = Mat::from_fn(n, 1, |i, _| y[(i, 0)] / y_norm);

        let converged = (rayleigh - lambda).abs() <= POWER_TOLERANCE * rayleigh.abs();
        lambda = rayleigh;
        if converged {
            log::debug!("Power iteration converged after {} steps.", iteration + 1);
            break;
        }
    }

    (lambda * LMAX_MARGIN).min(bound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::sparse::Triplet;

    fn star_laplacian(leaves: usize) -> SparseColMat<usize, f64> {
        // Star graph: eigenvalues 0, 1 (multiplicity leaves - 1) and leaves + 1.
        let mut triplets = vec![Triplet { row: 0, col: 0, val: leaves as f64 }];
        for leaf in 1..=leaves {
            triplets.push(Triplet { row: leaf, col: leaf, val: 1.0 });
            triplets.push(Triplet { row: 0, col: leaf, val: -1.0 });
            triplets.push(Triplet { row: leaf, col: 0, val: -1.0 });
        }
        SparseColMat::try_new_from_triplets(leaves + 1, leaves + 1, &triplets).unwrap()
    }

    #[test]
    fn test_estimate_brackets_true_lmax() {
        let l = star_laplacian(6);
        let estimate = estimate_lmax(&l);
        assert!(estimate >= 7.0 * 0.999, "estimate {estimate} too small");
        assert!(estimate <= gershgorin_bound(&l));
    }

    #[test]
    fn test_gershgorin_bound() {
        assert_eq!(gershgorin_bound(&star_laplacian(4)), 8.0);
    }

    #[test]
    fn test_zero_operator() {
        let l = SparseColMat::<usize, f64>::try_new_from_triplets(3, 3, &[]).unwrap();
        assert_eq!(estimate_lmax(&l), 0.0);
    }
}
