//! A weighted graph together with its lazily computed spectral artifacts.
//!
//! The [`Graph`] owns the adjacency matrix and memoizes every derived object
//! (Laplacian, Fourier basis, `lmax` estimate, incidence operator) in a
//! compute-once cell. Each artifact is computed explicitly by a `compute_*`
//! method, after which the matching accessor returns it. Accessing an artifact
//! that was never computed is a `Precondition` error.
//!
//! Mutating the adjacency matrix or the Laplacian type requires `&mut self`
//! and drops every cached artifact, so readers never observe stale data.

use crate::{
    algorithms::power::estimate_lmax,
    error::{GspError, configuration, dimension_mismatch, not_implemented, precondition},
    fourier::{FourierBasis, compute_fourier_basis},
    laplacian::{LaplacianType, build_laplacian},
    matrix::Scalar,
    operators::IncidenceOperator,
};
use faer::{Mat, MatRef, sparse::SparseColMat};
use std::sync::OnceLock;

/// Relative tolerance used to decide whether `W` is symmetric.
const DIRECTED_TOLERANCE: f64 = 1e-12;

type Cell<T> = OnceLock<Result<T, GspError>>;

/// Returns the cached artifact, or the cached failure that produced it.
fn cached<T>(cell: &Cell<T>) -> Option<Result<&T, GspError>> {
    cell.get().map(|result| result.as_ref().map_err(Clone::clone))
}

/// A weighted graph and its cached spectral artifacts.
#[derive(Debug)]
pub struct Graph {
    w: SparseColMat<usize, f64>,
    lap_type: LaplacianType,
    directed: bool,
    laplacian: Cell<SparseColMat<usize, f64>>,
    basis: Cell<FourierBasis>,
    lmax_estimate: OnceLock<f64>,
    incidence: Cell<IncidenceOperator>,
}

impl Graph {
    /// Creates a graph from its weighted adjacency matrix.
    ///
    /// The graph is flagged as directed when `w` is not symmetric.
    ///
    /// # Errors
    /// * `DimensionMismatch` if `w` is not square.
    /// * `Configuration` if `w` has no vertex.
    pub fn new(w: SparseColMat<usize, f64>, lap_type: LaplacianType) -> Result<Self, GspError> {
        check_adjacency(&w)?;
        let directed = is_directed(&w);
        log::debug!(
            "Created {} graph with {} vertices ({} Laplacian).",
            if directed { "directed" } else { "undirected" },
            w.nrows(),
            lap_type
        );
        Ok(Self {
            w,
            lap_type,
            directed,
            laplacian: OnceLock::new(),
            basis: OnceLock::new(),
            lmax_estimate: OnceLock::new(),
            incidence: OnceLock::new(),
        })
    }

    pub fn n_vertices(&self) -> usize {
        self.w.nrows()
    }

    pub fn weights(&self) -> &SparseColMat<usize, f64> {
        &self.w
    }

    pub fn lap_type(&self) -> LaplacianType {
        self.lap_type
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Replaces the adjacency matrix and drops every cached artifact.
    ///
    /// # Errors
    /// Same as [`Graph::new`]. On error the graph is left untouched.
    pub fn set_weights(&mut self, w: SparseColMat<usize, f64>) -> Result<(), GspError> {
        check_adjacency(&w)?;
        self.directed = is_directed(&w);
        self.w = w;
        self.invalidate();
        Ok(())
    }

    /// Changes the Laplacian type and drops every cached artifact.
    pub fn set_lap_type(&mut self, lap_type: LaplacianType) {
        self.lap_type = lap_type;
        self.invalidate();
    }

    /// Drops every cached artifact; the next `compute_*` call rebuilds it.
    pub fn invalidate(&mut self) {
        self.laplacian.take();
        self.basis.take();
        self.lmax_estimate.take();
        self.incidence.take();
    }

    /// Builds the Laplacian if needed and returns it.
    ///
    /// # Errors
    /// See [`build_laplacian`].
    pub fn compute_laplacian(&self) -> Result<&SparseColMat<usize, f64>, GspError> {
        self.laplacian
            .get_or_init(|| build_laplacian(&self.w, self.lap_type))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// The Laplacian computed by [`Graph::compute_laplacian`].
    pub fn laplacian(&self) -> Result<&SparseColMat<usize, f64>, GspError> {
        cached(&self.laplacian).unwrap_or_else(|| {
            Err(precondition(
                "the Laplacian has not been computed; call compute_laplacian first.",
            ))
        })
    }

    /// Computes the Fourier basis of the Laplacian if needed and returns it.
    ///
    /// # Errors
    /// * `Precondition` if the Laplacian has not been computed.
    /// * Any error of [`compute_fourier_basis`].
    pub fn compute_fourier_basis(&self) -> Result<&FourierBasis, GspError> {
        if let Some(basis) = cached(&self.basis) {
            log::debug!("Fourier basis already computed; returning the cached basis.");
            return basis;
        }
        let l = self.laplacian()?;
        self.basis
            .get_or_init(|| compute_fourier_basis(l))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// The basis computed by [`Graph::compute_fourier_basis`].
    pub fn fourier_basis(&self) -> Result<&FourierBasis, GspError> {
        cached(&self.basis).unwrap_or_else(|| {
            Err(precondition(
                "the Fourier basis has not been computed; call compute_fourier_basis first.",
            ))
        })
    }

    /// Upper bound of the spectrum.
    ///
    /// This is the exact largest eigenvalue when the Fourier basis is
    /// available, and a cached power-iteration estimate otherwise.
    ///
    /// # Errors
    /// Returns `Precondition` if neither the basis nor the Laplacian exists.
    pub fn lmax(&self) -> Result<f64, GspError> {
        if let Some(Ok(basis)) = cached(&self.basis) {
            return Ok(basis.lmax());
        }
        let l = self.laplacian()?;
        Ok(*self.lmax_estimate.get_or_init(|| {
            let estimate = estimate_lmax(l);
            log::info!(
                "lmax was not precomputed; estimated it as {estimate:.6}. \
                 Compute the Fourier basis for the exact value."
            );
            estimate
        }))
    }

    /// Builds the gradient and divergence operators if needed and returns them.
    ///
    /// # Errors
    /// * `NotImplemented` if the graph is directed or uses the normalized Laplacian.
    /// * `Domain` if a weight is negative.
    pub fn compute_differential_operator(&self) -> Result<&IncidenceOperator, GspError> {
        if self.lap_type == LaplacianType::Normalized {
            return Err(not_implemented(
                "gradient and divergence are only defined for the combinatorial Laplacian.",
            ));
        }
        self.incidence
            .get_or_init(|| IncidenceOperator::from_weights(&self.w, self.directed))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// The operator built by [`Graph::compute_differential_operator`].
    pub fn differential_operator(&self) -> Result<&IncidenceOperator, GspError> {
        cached(&self.incidence).unwrap_or_else(|| {
            Err(precondition(
                "the differential operator has not been computed; \
                 call compute_differential_operator first.",
            ))
        })
    }

    /// Forward graph Fourier transform of an N×Ns signal.
    pub fn gft<T: Scalar>(&self, f: MatRef<'_, T>) -> Result<Mat<T>, GspError> {
        self.fourier_basis()?.gft(f)
    }

    /// Inverse graph Fourier transform of an N×Ns coefficient matrix.
    pub fn igft<T: Scalar>(&self, f_hat: MatRef<'_, T>) -> Result<Mat<T>, GspError> {
        self.fourier_basis()?.igft(f_hat)
    }

    /// Gradient of a vertex signal, one row per edge.
    pub fn grad<T: Scalar>(&self, f: MatRef<'_, T>) -> Result<Mat<T>, GspError> {
        self.differential_operator()?.grad(f)
    }

    /// Divergence of an edge signal, one row per vertex.
    pub fn div<T: Scalar>(&self, s: MatRef<'_, T>) -> Result<Mat<T>, GspError> {
        self.differential_operator()?.div(s)
    }
}

fn check_adjacency(w: &SparseColMat<usize, f64>) -> Result<(), GspError> {
    if w.ncols() != w.nrows() {
        return Err(dimension_mismatch("adjacency columns", w.nrows(), w.ncols()));
    }
    if w.nrows() == 0 {
        return Err(configuration("a graph needs at least one vertex."));
    }
    Ok(())
}

/// A graph is directed when `W` differs from its transpose.
fn is_directed(w: &SparseColMat<usize, f64>) -> bool {
    let mut forward: Vec<(usize, usize, f64)> = w
        .triplet_iter()
        .filter(|t| *t.val != 0.0)
        .map(|t| (t.row, t.col, *t.val))
        .collect();
    let mut backward: Vec<(usize, usize, f64)> =
        forward.iter().map(|&(i, j, v)| (j, i, v)).collect();
    forward.sort_by_key(|&(i, j, _)| (i, j));
    backward.sort_by_key(|&(i, j, _)| (i, j));

    forward.iter().zip(&backward).any(|(&(i, j, a), &(k, l, b))| {
        (i, j) != (k, l) || (a - b).abs() > DIRECTED_TOLERANCE * a.abs().max(b.abs())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::GspErrorKind, utils::synthetic::path_weights};
    use faer::sparse::Triplet;

    #[test]
    fn test_artifacts_require_explicit_computation() {
        let g = Graph::new(path_weights(4).unwrap(), LaplacianType::Combinatorial).unwrap();
        let f = Mat::<f64>::zeros(4, 1);

        assert!(matches!(g.laplacian().unwrap_err().kind(), GspErrorKind::Precondition(_)));
        assert!(matches!(
            g.compute_fourier_basis().unwrap_err().kind(),
            GspErrorKind::Precondition(_)
        ));
        assert!(matches!(g.gft(f.as_ref()).unwrap_err().kind(), GspErrorKind::Precondition(_)));
        assert!(matches!(g.grad(f.as_ref()).unwrap_err().kind(), GspErrorKind::Precondition(_)));
        assert!(matches!(g.lmax().unwrap_err().kind(), GspErrorKind::Precondition(_)));
    }

    #[test]
    fn test_basis_is_cached_until_invalidated() {
        let mut g = Graph::new(path_weights(5).unwrap(), LaplacianType::Combinatorial).unwrap();
        g.compute_laplacian().unwrap();
        let first = g.compute_fourier_basis().unwrap() as *const FourierBasis;
        let second = g.compute_fourier_basis().unwrap() as *const FourierBasis;
        assert_eq!(first, second);

        g.set_lap_type(LaplacianType::Normalized);
        assert!(g.fourier_basis().is_err());
        g.compute_laplacian().unwrap();
        let basis = g.compute_fourier_basis().unwrap();
        assert!(basis.lmax() <= 2.0 + 1e-12);
    }

    #[test]
    fn test_lmax_prefers_exact_value() {
        let g = Graph::new(path_weights(6).unwrap(), LaplacianType::Combinatorial).unwrap();
        g.compute_laplacian().unwrap();
        let estimate = g.lmax().unwrap();
        let exact = g.compute_fourier_basis().unwrap().lmax();
        assert!(estimate >= exact * 0.999);
        assert_eq!(g.lmax().unwrap(), exact);
    }

    #[test]
    fn test_normalized_graph_rejects_gradient() {
        let g = Graph::new(path_weights(3).unwrap(), LaplacianType::Normalized).unwrap();
        let err = g.compute_differential_operator().unwrap_err();
        assert!(matches!(err.kind(), GspErrorKind::NotImplemented(_)));
    }

    #[test]
    fn test_asymmetric_weights_are_directed() {
        let triplets = [
            Triplet { row: 0, col: 1, val: 1.0 },
            Triplet { row: 1, col: 2, val: 1.0 },
        ];
        let w = SparseColMat::try_new_from_triplets(3, 3, &triplets).unwrap();
        let g = Graph::new(w, LaplacianType::Combinatorial).unwrap();
        assert!(g.is_directed());
        let err = g.compute_differential_operator().unwrap_err();
        assert!(matches!(err.kind(), GspErrorKind::NotImplemented(_)));
        assert!(!Graph::new(path_weights(3).unwrap(), LaplacianType::None).unwrap().is_directed());
    }

    #[test]
    fn test_rejects_malformed_adjacency() {
        let w = SparseColMat::<usize, f64>::try_new_from_triplets(2, 3, &[]).unwrap();
        assert!(matches!(
            Graph::new(w, LaplacianType::Combinatorial).unwrap_err().kind(),
            GspErrorKind::DimensionMismatch { .. }
        ));
        let w = SparseColMat::<usize, f64>::try_new_from_triplets(0, 0, &[]).unwrap();
        assert!(matches!(
            Graph::new(w, LaplacianType::Combinatorial).unwrap_err().kind(),
            GspErrorKind::Configuration(_)
        ));
    }
}
