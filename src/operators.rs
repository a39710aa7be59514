//! Differential operators on graphs: gradient and divergence.
//!
//! Every undirected edge `k = {i, j}` with weight `w_k` is oriented from the
//! strictly lower triangle of the adjacency matrix: `v_in[k] = i` is the row
//! index and `v_out[k] = j < i` the column index. The gradient matrix `D` is the
//! square-root-weighted oriented incidence matrix,
//!
//! ```text
//! D[k, v_in[k]]  = +√w_k
//! D[k, v_out[k]] = -√w_k
//! ```
//!
//! so that `grad(f) = D f` measures the weighted drop of `f` across every edge,
//! `div(s) = Dᵗ s` is its formal adjoint, and the combinatorial Laplacian
//! factors as `L = Dᵗ D`.
//!
//! Directed graphs are not supported: the orientation convention above is
//! only meaningful for symmetric adjacency matrices.

use crate::{
    error::{GspError, dimension_mismatch, domain, not_implemented},
    matrix::{Scalar, narrow, sparse_apply, sparse_from_triplets, widen},
};
use faer::{
    Mat, MatRef,
    sparse::{SparseColMat, Triplet},
};

/// The oriented edges of an undirected graph.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSet {
    /// Row (larger) endpoint of every edge.
    pub v_in: Vec<usize>,
    /// Column (smaller) endpoint of every edge.
    pub v_out: Vec<usize>,
    /// Weight of every edge.
    pub weights: Vec<f64>,
}

impl EdgeSet {
    /// The number of edges, `Ne`.
    pub fn n_edges(&self) -> usize {
        self.v_in.len()
    }
}

/// Extracts the edge set from the strictly lower triangle of `w`.
///
/// Edges are listed in row-major order of their `(v_in, v_out)` position.
/// Explicitly stored zeros and diagonal entries are skipped.
///
/// # Errors
/// * `NotImplemented` if the graph is directed.
/// * `Domain` if an edge weight is negative or not finite.
pub fn build_edge_set(w: &SparseColMat<usize, f64>, directed: bool) -> Result<EdgeSet, GspError> {
    if directed {
        return Err(not_implemented(
            "incidence structure of directed graphs; the edge orientation convention is undefined.",
        ));
    }

    let mut entries: Vec<(usize, usize, f64)> = Vec::new();
    for triplet in w.triplet_iter() {
        let (row, col, val) = (triplet.row, triplet.col, *triplet.val);
        if row <= col || val == 0.0 {
            continue;
        }
        if !val.is_finite() || val < 0.0 {
            return Err(domain(format!(
                "edge ({row}, {col}) has weight {val}; the gradient needs finite nonnegative weights."
            )));
        }
        entries.push((row, col, val));
    }
    entries.sort_by_key(|&(row, col, _)| (row, col));

    let mut edges = EdgeSet {
        v_in: Vec::with_capacity(entries.len()),
        v_out: Vec::with_capacity(entries.len()),
        weights: Vec::with_capacity(entries.len()),
    };
    for (row, col, val) in entries {
        edges.v_in.push(row);
        edges.v_out.push(col);
        edges.weights.push(val);
    }
    Ok(edges)
}

/// Assembles the Ne×N gradient matrix of an edge set.
fn gradient_from_edges(
    edges: &EdgeSet,
    n_vertices: usize,
) -> Result<SparseColMat<usize, f64>, GspError> {
    let mut triplets = Vec::with_capacity(2 * edges.n_edges());
    for (k, ((&i, &j), &weight)) in edges
        .v_in
        .iter()
        .zip(&edges.v_out)
        .zip(&edges.weights)
        .enumerate()
    {
        let root = weight.sqrt();
        triplets.push(Triplet { row: k, col: i, val: root });
        triplets.push(Triplet { row: k, col: j, val: -root });
    }
    sparse_from_triplets(edges.n_edges(), n_vertices, &triplets)
}

/// Builds the Ne×N gradient (oriented incidence) matrix of the graph `w`.
///
/// # Errors
/// See [`build_edge_set`].
pub fn build_gradient(
    w: &SparseColMat<usize, f64>,
    directed: bool,
) -> Result<SparseColMat<usize, f64>, GspError> {
    let edges = build_edge_set(w, directed)?;
    gradient_from_edges(&edges, w.nrows())
}

/// The gradient/divergence pair of an undirected graph.
///
/// Both `D` and `Dᵗ` are stored so that either direction is a single sparse
/// product.
#[derive(Debug, Clone)]
pub struct IncidenceOperator {
    edges: EdgeSet,
    n_vertices: usize,
    gradient: SparseColMat<usize, f64>,
    divergence: SparseColMat<usize, f64>,
}

impl IncidenceOperator {
    /// Extracts the edges of `w` and builds `D` and `Dᵗ`.
    ///
    /// # Errors
    /// See [`build_edge_set`].
    pub fn from_weights(w: &SparseColMat<usize, f64>, directed: bool) -> Result<Self, GspError> {
        let n_vertices = w.nrows();
        if w.ncols() != n_vertices {
            return Err(dimension_mismatch("adjacency columns", n_vertices, w.ncols()));
        }
        let edges = build_edge_set(w, directed)?;
        let gradient = gradient_from_edges(&edges, n_vertices)?;

        let transposed: Vec<Triplet<usize, usize, f64>> = gradient
            .triplet_iter()
            .map(|t| Triplet {
                row: t.col,
                col: t.row,
                val: *t.val,
            })
            .collect();
        let divergence = sparse_from_triplets(n_vertices, edges.n_edges(), &transposed)?;

        log::debug!(
            "Built incidence operator with {} edges on {n_vertices} vertices.",
            edges.n_edges()
        );
        Ok(Self {
            edges,
            n_vertices,
            gradient,
            divergence,
        })
    }

    pub fn edges(&self) -> &EdgeSet {
        &self.edges
    }

    pub fn n_edges(&self) -> usize {
        self.edges.n_edges()
    }

    pub fn n_vertices(&self) -> usize {
        self.n_vertices
    }

    /// The Ne×N gradient matrix `D`.
    pub fn gradient_matrix(&self) -> &SparseColMat<usize, f64> {
        &self.gradient
    }

    /// Maps a vertex signal (N×Ns) to an edge signal (Ne×Ns): `D f`.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if `f` does not have N rows.
    pub fn grad<T: Scalar>(&self, f: MatRef<'_, T>) -> Result<Mat<T>, GspError> {
        if f.nrows() != self.n_vertices {
            return Err(dimension_mismatch("vertices", self.n_vertices, f.nrows()));
        }
        let flow = sparse_apply(&self.gradient, widen(f).as_ref());
        Ok(narrow(flow.as_ref()))
    }

    /// Maps an edge signal (Ne×Ns) back to a vertex signal (N×Ns): `Dᵗ s`.
    ///
    /// This is the negative of the discrete divergence and the adjoint of
    /// [`IncidenceOperator::grad`].
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if `s` does not have Ne rows.
    pub fn div<T: Scalar>(&self, s: MatRef<'_, T>) -> Result<Mat<T>, GspError> {
        if s.nrows() != self.n_edges() {
            return Err(dimension_mismatch("edges", self.n_edges(), s.nrows()));
        }
        let vertex = sparse_apply(&self.divergence, widen(s).as_ref());
        Ok(narrow(vertex.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::GspErrorKind,
        laplacian::{LaplacianType, build_laplacian},
        matrix::to_dense,
    };

    fn weighted_triangle() -> SparseColMat<usize, f64> {
        let edges = [(0, 1, 4.0), (1, 2, 1.0), (0, 2, 9.0)];
        let mut triplets = Vec::new();
        for (i, j, w) in edges {
            triplets.push(Triplet { row: i, col: j, val: w });
            triplets.push(Triplet { row: j, col: i, val: w });
        }
        SparseColMat::try_new_from_triplets(3, 3, &triplets).unwrap()
    }

    #[test]
    fn test_edges_come_from_lower_triangle() {
        let edges = build_edge_set(&weighted_triangle(), false).unwrap();
        assert_eq!(edges.n_edges(), 3);
        assert_eq!(edges.v_in, vec![1, 2, 2]);
        assert_eq!(edges.v_out, vec![0, 0, 1]);
        assert_eq!(edges.weights, vec![4.0, 9.0, 1.0]);
    }

    #[test]
    fn test_gradient_entries_are_root_weights() {
        let d = to_dense(&build_gradient(&weighted_triangle(), false).unwrap());
        assert_eq!(d.nrows(), 3);
        assert_eq!(d.ncols(), 3);
        assert_eq!(d[(0, 1)], 2.0);
        assert_eq!(d[(0, 0)], -2.0);
        assert_eq!(d[(1, 2)], 3.0);
        assert_eq!(d[(1, 0)], -3.0);
    }

    #[test]
    fn test_gradient_factors_combinatorial_laplacian() {
        let w = weighted_triangle();
        let d = to_dense(&build_gradient(&w, false).unwrap());
        let l = to_dense(&build_laplacian(&w, LaplacianType::Combinatorial).unwrap());
        let dtd = d.as_ref().transpose() * d.as_ref();
        assert!((&dtd - &l).norm_l2() < 1e-12);
    }

    #[test]
    fn test_directed_graph_is_not_supported() {
        let err = build_edge_set(&weighted_triangle(), true).unwrap_err();
        assert!(matches!(err.kind(), GspErrorKind::NotImplemented(_)));
    }

    #[test]
    fn test_div_rejects_vertex_signal() {
        let op = IncidenceOperator::from_weights(&weighted_triangle(), false).unwrap();
        let s = Mat::<f64>::zeros(4, 1);
        let err = op.div(s.as_ref()).unwrap_err();
        assert_eq!(
            *err.kind(),
            GspErrorKind::DimensionMismatch {
                domain: "edges",
                expected: 3,
                actual: 4
            }
        );
    }

    #[test]
    fn test_grad_preserves_single_precision() {
        let op = IncidenceOperator::from_weights(&weighted_triangle(), false).unwrap();
        let f: Mat<f32> = Mat::from_fn(3, 1, |i, _| i as f32);
        let g: Mat<f32> = op.grad(f.as_ref()).unwrap();
        assert_eq!(g[(0, 0)], 2.0);
        assert_eq!(g[(1, 0)], 6.0);
        assert_eq!(g[(2, 0)], 1.0);
    }
}
