//! Chebyshev polynomial approximation of spectral filters.
//!
//! A spectral kernel `h` is approximated on the interval `[0, lmax]` by a
//! truncated Chebyshev series. With `a = lmax / 2`, the affine map
//! `x ↦ (x - a) / a` sends `[0, lmax]` onto the canonical interval `[-1, 1]`,
//! and the coefficients are obtained by Chebyshev–Gauss quadrature on
//! `m + 1` nodes:
//!
//! ```text
//! c_k = 2/(m+1) · Σ_j h(a·cos θ_j + a) · cos(k θ_j),   θ_j = π (j + ½) / (m+1)
//! ```
//!
//! The filtered signal `h(L) f` is then evaluated with the three-term recurrence
//!
//! ```text
//! T_0 = f
//! T_1 = (L f - a f) / a
//! T_k = (2/a) (L T_{k-1} - a T_{k-1}) - T_{k-2}
//! g   = ½ c_0 T_0 + Σ_{k≥1} c_k T_k
//! ```
//!
//! which only needs sparse matrix-vector products with `L`. The cost is
//! O(m · nnz(L)) per signal column and no eigendecomposition is ever formed.

use crate::{
    error::{GspError, configuration},
    matrix::sparse_apply,
};
use faer::{Mat, MatRef, sparse::SparseColMat};
use std::f64::consts::PI;

/// Computes the Chebyshev coefficients `c_0..=c_order` of `h` on `[0, lmax]`.
///
/// The caller is responsible for validating `order >= 1` and `lmax > 0`;
/// see [`crate::filters::compute_cheby_coefficients`] for the checked entry point.
pub fn cheby_coefficients<F>(h: F, order: usize, lmax: f64) -> Vec<f64>
where
    F: Fn(f64) -> f64,
{
    let nodes = order + 1;
    let a = lmax / 2.0;
    let thetas: Vec<f64> = (0..nodes)
        .map(|j| PI * (j as f64 + 0.5) / nodes as f64)
        .collect();
    let samples: Vec<f64> = thetas.iter().map(|&theta| h(a * theta.cos() + a)).collect();

    (0..nodes)
        .map(|k| {
            let sum: f64 = samples
                .iter()
                .zip(&thetas)
                .map(|(&sample, &theta)| sample * (k as f64 * theta).cos())
                .sum();
            2.0 / nodes as f64 * sum
        })
        .collect()
}

/// Evaluates the truncated Chebyshev series at a scalar `x` in `[0, lmax]`.
///
/// This is the scalar counterpart of [`cheby_recurrence`], useful for sampling
/// the response curve of the approximation itself.
pub fn cheby_eval(coeffs: &[f64], lmax: f64, x: f64) -> f64 {
    let a = lmax / 2.0;
    let y = (x - a) / a;
    let Some((&c0, rest)) = coeffs.split_first() else {
        return 0.0;
    };

    let mut t_prev = 1.0;
    let mut t_curr = y;
    let mut acc = 0.5 * c0;
    for (k, &ck) in rest.iter().enumerate() {
        if k > 0 {
            let t_next = 2.0 * y * t_curr - t_prev;
            t_prev = t_curr;
            t_curr = t_next;
        }
        acc += ck * t_curr;
    }
    acc
}

/// One step of the recurrence on the rescaled Laplacian `(L - a I) / a`.
///
/// Returns `2 (L - aI)/a · t_curr - t_prev`, or `(L - aI)/a · t_curr` for the first step.
fn recurrence_step(
    l: &SparseColMat<usize, f64>,
    a: f64,
    t_curr: MatRef<'_, f64>,
    t_prev: Option<MatRef<'_, f64>>,
) -> Mat<f64> {
    let lt = sparse_apply(l, t_curr);
    let (nrows, ncols) = (t_curr.nrows(), t_curr.ncols());
    match t_prev {
        Some(t_prev) => Mat::from_fn(nrows, ncols, |i, j| {
            2.0 / a * (lt[(i, j)] - a * t_curr[(i, j)]) - t_prev[(i, j)]
        }),
        None => Mat::from_fn(nrows, ncols, |i, j| (lt[(i, j)] - a * t_curr[(i, j)]) / a),
    }
}

/// Applies the Chebyshev approximation of a kernel to every column of `f`.
///
/// # Arguments
/// * `l`: The sparse N×N Laplacian.
/// * `coeffs`: Chebyshev coefficients, at least two of them.
/// * `lmax`: The upper end of the approximation interval.
/// * `f`: The N×Ns signal matrix.
///
/// # Returns
/// `h(L) f` approximated by the series, with the shape of `f`.
///
/// # Errors
/// Returns a `Configuration` error if fewer than two coefficients are given.
pub fn cheby_recurrence(
    l: &SparseColMat<usize, f64>,
    coeffs: &[f64],
    lmax: f64,
    f: MatRef<'_, f64>,
) -> Result<Mat<f64>, GspError> {
    if coeffs.len() < 2 {
        return Err(configuration(format!(
            "a Chebyshev series needs at least two coefficients, got {}.",
            coeffs.len()
        )));
    }
    let a = lmax / 2.0;
    let (nrows, ncols) = (f.nrows(), f.ncols());

    let mut t_prev = f.to_owned();
    let mut t_curr = recurrence_step(l, a, t_prev.as_ref(), None);
    let mut result = Mat::from_fn(nrows, ncols, |i, j| {
        0.5 * coeffs[0] * t_prev[(i, j)] + coeffs[1] * t_curr[(i, j)]
    });

    for &ck in &coeffs[2..] {
        let t_next = recurrence_step(l, a, t_curr.as_ref(), Some(t_prev.as_ref()));
        for j in 0..ncols {
            for i in 0..nrows {
                result[(i, j)] += ck * t_next[(i, j)];
            }
        }
        t_prev = t_curr;
        t_curr = t_next;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::sparse::Triplet;

    fn path_laplacian(n: usize) -> SparseColMat<usize, f64> {
        let mut triplets = Vec::new();
        for i in 0..n {
            let degree = if i == 0 || i == n - 1 { 1.0 } else { 2.0 };
            triplets.push(Triplet { row: i, col: i, val: degree });
            if i + 1 < n {
                triplets.push(Triplet { row: i, col: i + 1, val: -1.0 });
                triplets.push(Triplet { row: i + 1, col: i, val: -1.0 });
            }
        }
        SparseColMat::try_new_from_triplets(n, n, &triplets).unwrap()
    }

    #[test]
    fn test_constant_kernel_coefficients() {
        let c = cheby_coefficients(|_| 3.0, 4, 2.0);
        assert_eq!(c.len(), 5);
        assert!((c[0] - 6.0).abs() < 1e-12);
        for &ck in &c[1..] {
            assert!(ck.abs() < 1e-12);
        }
    }

    #[test]
    fn test_linear_kernel_is_exact() {
        // h(x) = x on [0, 4] is a + a·y with a = 2, so c_0 = 2a and c_1 = a.
        let c = cheby_coefficients(|x| x, 3, 4.0);
        assert!((c[0] - 4.0).abs() < 1e-12);
        assert!((c[1] - 2.0).abs() < 1e-12);
        for x in [0.0, 0.7, 2.5, 4.0] {
            assert!((cheby_eval(&c, 4.0, x) - x).abs() < 1e-12);
        }
    }

    #[test]
    fn test_scalar_series_converges_for_smooth_kernel() {
        let lmax = 3.0;
        let h = |x: f64| (-x).exp();
        let c = cheby_coefficients(h, 20, lmax);
        for x in [0.0, 0.5, 1.5, 2.9] {
            assert!((cheby_eval(&c, lmax, x) - h(x)).abs() < 1e-10);
        }
    }

    #[test]
    fn test_recurrence_applies_laplacian_for_linear_kernel() {
        let l = path_laplacian(5);
        let lmax = 4.0;
        let c = cheby_coefficients(|x| x, 2, lmax);
        let f = Mat::from_fn(5, 1, |i, _| (i * i) as f64);

        let g = cheby_recurrence(&l, &c, lmax, f.as_ref()).unwrap();
        let expected = sparse_apply(&l, f.as_ref());
        assert!((&g - &expected).norm_l2() < 1e-10);
    }
}
