//! Construction of graph Laplacians from a weighted adjacency matrix.
//!
//! The Laplacian is the operator whose eigenvectors play the role of Fourier
//! modes on a graph. Three normalizations are supported:
//!
//! - **Combinatorial**: `L = D - W`, where `D = diag(rowSums(W))`.
//! - **Normalized**: `L = I - D^{-1/2} W D^{-1/2}`. Undefined when any vertex
//!   is isolated, since the normalization divides by the degree.
//! - **None**: the zero matrix, for graphs that carry no spectral structure.
//!
//! All outputs are sparse and the construction is a pure function of `W`.

use crate::{
    error::{GspError, configuration, dimension_mismatch, domain},
    matrix::sparse_from_triplets,
};
use faer::sparse::{SparseColMat, Triplet};
use std::{fmt, str::FromStr};

/// The normalization policy used to derive a Laplacian from `W`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LaplacianType {
    /// `L = D - W`.
    #[default]
    Combinatorial,
    /// `L = I - D^{-1/2} W D^{-1/2}`.
    Normalized,
    /// The zero matrix.
    None,
}

impl LaplacianType {
    /// The canonical lowercase name of the policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            LaplacianType::Combinatorial => "combinatorial",
            LaplacianType::Normalized => "normalized",
            LaplacianType::None => "none",
        }
    }
}

impl fmt::Display for LaplacianType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LaplacianType {
    type Err = GspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "combinatorial" => Ok(LaplacianType::Combinatorial),
            "normalized" => Ok(LaplacianType::Normalized),
            "none" => Ok(LaplacianType::None),
            other => Err(configuration(format!("unknown Laplacian type '{other}'."))),
        }
    }
}

/// Computes the weighted degree (row sum) of every vertex.
///
/// # Errors
/// Returns a `Domain` error if `w` holds a negative or non-finite weight.
pub fn degrees(w: &SparseColMat<usize, f64>) -> Result<Vec<f64>, GspError> {
    let mut d = vec![0.0; w.nrows()];
    for triplet in w.triplet_iter() {
        let val = *triplet.val;
        if !val.is_finite() || val < 0.0 {
            return Err(domain(format!(
                "edge weight W[{}, {}] = {val} is not a finite nonnegative number.",
                triplet.row, triplet.col
            )));
        }
        d[triplet.row] += val;
    }
    Ok(d)
}

/// Builds the Laplacian of the graph with adjacency matrix `w`.
///
/// # Arguments
/// * `w`: The square, nonnegative weighted adjacency matrix.
/// * `lap_type`: The normalization policy.
///
/// # Returns
/// The sparse N×N Laplacian.
///
/// # Errors
/// * `DimensionMismatch` if `w` is not square.
/// * `Domain` if `w` holds a negative weight, or if `lap_type` is
///   [`LaplacianType::Normalized`] and some vertex has zero degree.
pub fn build_laplacian(
    w: &SparseColMat<usize, f64>,
    lap_type: LaplacianType,
) -> Result<SparseColMat<usize, f64>, GspError> {
    let n = w.nrows();
    if w.ncols() != n {
        return Err(dimension_mismatch("adjacency columns", n, w.ncols()));
    }

    let d = degrees(w)?;

    if lap_type == LaplacianType::Normalized {
        if let Some(isolated) = d.iter().position(|&di| di == 0.0) {
            return Err(domain(format!(
                "vertex {isolated} has zero degree; the normalized Laplacian is undefined for isolated vertices."
            )));
        }
    }

    // A lone vertex with a defined degree yields the zero operator.
    if n == 1 || lap_type == LaplacianType::None {
        return sparse_from_triplets(n, n, &[]);
    }

    // Diagonal and off-diagonal parts are assembled separately so that
    // self-loops fold into the diagonal without relying on duplicate summation.
    let mut diagonal = match lap_type {
        LaplacianType::Combinatorial => d.clone(),
        _ => vec![1.0; n],
    };
    let inv_sqrt_d: Vec<f64> = d.iter().map(|&di| 1.0 / di.sqrt()).collect();

    let mut triplets = Vec::with_capacity(w.triplet_iter().count() + n);
    for triplet in w.triplet_iter() {
        let (i, j, val) = (triplet.row, triplet.col, *triplet.val);
        let entry = match lap_type {
            LaplacianType::Combinatorial => -val,
            _ => -val * inv_sqrt_d[i] * inv_sqrt_d[j],
        };
        if i == j {
            diagonal[i] += entry;
        } else if entry != 0.0 {
            triplets.push(Triplet {
                row: i,
                col: j,
                val: entry,
            });
        }
    }
    for (i, &val) in diagonal.iter().enumerate() {
        if val != 0.0 {
            triplets.push(Triplet { row: i, col: i, val });
        }
    }

    log::debug!(
        "Built {lap_type} Laplacian for {n} vertices with {} stored entries.",
        triplets.len()
    );
    sparse_from_triplets(n, n, &triplets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::GspErrorKind, matrix::to_dense};

    fn triangle() -> SparseColMat<usize, f64> {
        let edges = [(0, 1, 1.0), (1, 2, 2.0), (0, 2, 4.0)];
        let mut triplets = Vec::new();
        for (i, j, w) in edges {
            triplets.push(Triplet { row: i, col: j, val: w });
            triplets.push(Triplet { row: j, col: i, val: w });
        }
        SparseColMat::try_new_from_triplets(3, 3, &triplets).unwrap()
    }

    #[test]
    fn test_combinatorial_rows_sum_to_zero() {
        let l = to_dense(&build_laplacian(&triangle(), LaplacianType::Combinatorial).unwrap());
        assert_eq!(l[(0, 0)], 5.0);
        assert_eq!(l[(1, 1)], 3.0);
        assert_eq!(l[(2, 2)], 6.0);
        assert_eq!(l[(1, 2)], -2.0);
        for i in 0..3 {
            let row_sum: f64 = (0..3).map(|j| l[(i, j)]).sum();
            assert!(row_sum.abs() < 1e-12);
        }
    }

    #[test]
    fn test_normalized_has_unit_diagonal() {
        let l = to_dense(&build_laplacian(&triangle(), LaplacianType::Normalized).unwrap());
        for i in 0..3 {
            assert!((l[(i, i)] - 1.0).abs() < 1e-12);
        }
        // -w_01 / sqrt(d_0 d_1) = -1 / sqrt(5 * 3)
        assert!((l[(0, 1)] + 1.0 / 15.0f64.sqrt()).abs() < 1e-12);
        assert!((l[(0, 1)] - l[(1, 0)]).abs() < 1e-15);
    }

    #[test]
    fn test_none_is_zero() {
        let l = build_laplacian(&triangle(), LaplacianType::None).unwrap();
        assert_eq!(l.nrows(), 3);
        assert_eq!(l.triplet_iter().count(), 0);
    }

    #[test]
    fn test_normalized_rejects_isolated_vertex() {
        let triplets = vec![
            Triplet { row: 0, col: 1, val: 1.0 },
            Triplet { row: 1, col: 0, val: 1.0 },
        ];
        let w = SparseColMat::try_new_from_triplets(3, 3, &triplets).unwrap();
        let err = build_laplacian(&w, LaplacianType::Normalized).unwrap_err();
        assert!(matches!(err.kind(), GspErrorKind::Domain(_)));

        // The combinatorial Laplacian is still defined.
        assert!(build_laplacian(&w, LaplacianType::Combinatorial).is_ok());
    }

    #[test]
    fn test_negative_weight_is_rejected() {
        let triplets = vec![
            Triplet { row: 0, col: 1, val: -1.0 },
            Triplet { row: 1, col: 0, val: -1.0 },
        ];
        let w = SparseColMat::try_new_from_triplets(2, 2, &triplets).unwrap();
        let err = build_laplacian(&w, LaplacianType::Combinatorial).unwrap_err();
        assert!(matches!(err.kind(), GspErrorKind::Domain(_)));
    }

    #[test]
    fn test_parse_laplacian_type() {
        assert_eq!("Normalized".parse::<LaplacianType>().unwrap(), LaplacianType::Normalized);
        assert_eq!("none".parse::<LaplacianType>().unwrap(), LaplacianType::None);
        let err = "random_walk".parse::<LaplacianType>().unwrap_err();
        assert!(matches!(err.kind(), GspErrorKind::Configuration(_)));
        assert_eq!(LaplacianType::Combinatorial.to_string(), "combinatorial");
    }
}
