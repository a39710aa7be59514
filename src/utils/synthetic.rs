//! Adjacency matrices of reference graphs with closed-form spectra.
//!
//! The combinatorial Laplacian of the path `P_n` has eigenvalues
//! `2 - 2 cos(πk/n)`, and that of the ring `C_n` has `2 - 2 cos(2πk/n)`,
//! for `k = 0..n`. Both are used to check the numerics against known truth.

use crate::{error::GspError, matrix::sparse_from_triplets};
use faer::sparse::{SparseColMat, Triplet};
use std::f64::consts::PI;

fn symmetric_from_edges(
    n: usize,
    edges: impl Iterator<Item = (usize, usize)>,
) -> Result<SparseColMat<usize, f64>, GspError> {
    let mut triplets = Vec::new();
    for (i, j) in edges {
        triplets.push(Triplet { row: i, col: j, val: 1.0 });
        triplets.push(Triplet { row: j, col: i, val: 1.0 });
    }
    sparse_from_triplets(n, n, &triplets)
}

/// Unit-weight path `0 - 1 - ... - (n-1)`.
pub fn path_weights(n: usize) -> Result<SparseColMat<usize, f64>, GspError> {
    symmetric_from_edges(n, (1..n).map(|i| (i - 1, i)))
}

/// Unit-weight ring: the path plus the edge `(n-1, 0)`.
///
/// Below three vertices the closing edge would duplicate an existing one, so
/// the ring degenerates to the path.
pub fn ring_weights(n: usize) -> Result<SparseColMat<usize, f64>, GspError> {
    let closing = (n >= 3).then(|| (n - 1, 0));
    symmetric_from_edges(n, (1..n).map(|i| (i - 1, i)).chain(closing))
}

/// Closed-form combinatorial Laplacian spectrum of [`path_weights`], ascending.
pub fn path_spectrum(n: usize) -> Vec<f64> {
    (0..n)
        .map(|k| 2.0 - 2.0 * (PI * k as f64 / n as f64).cos())
        .collect()
}

/// Closed-form combinatorial Laplacian spectrum of [`ring_weights`], ascending.
pub fn ring_spectrum(n: usize) -> Vec<f64> {
    let mut e: Vec<f64> = (0..n)
        .map(|k| 2.0 - 2.0 * (2.0 * PI * k as f64 / n as f64).cos())
        .collect();
    e.sort_by(f64::total_cmp);
    e
}
