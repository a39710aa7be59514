//! This module provides a high-level, user-friendly API for applying spectral
//! filters to signals living on the vertices of a [`Graph`].
//!
//! Two interchangeable strategies are offered through [`FilterMethod`]:
//!
//! - **Exact**: `U diag(h(e)) Uᵗ f`, which requires the Fourier basis and costs
//!   O(N²) per signal once the O(N³) eigendecomposition is available.
//! - **Chebyshev**: a polynomial of order `m` in the sparse Laplacian, costing
//!   O(m · nnz(L)) per signal and never forming the eigendecomposition.

use crate::{
    error::{GspError, configuration, dimension_mismatch},
    filters::{
        DEFAULT_CHEBY_ORDER, FilterBank, SpectralKernel, apply_cheby_filter,
        compute_cheby_coefficients,
    },
    graph::Graph,
    matrix::{Scalar, narrow, widen},
};
use faer::{Mat, MatRef};

/// How a spectral kernel is applied to a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMethod {
    /// Through the Fourier basis. The graph must hold a computed basis.
    Exact,
    /// Through a Chebyshev polynomial of the given order. The graph must hold
    /// a computed Laplacian; `lmax` is taken from the basis when available
    /// and estimated otherwise.
    Chebyshev { order: usize },
}

impl Default for FilterMethod {
    fn default() -> Self {
        FilterMethod::Chebyshev {
            order: DEFAULT_CHEBY_ORDER,
        }
    }
}

/// Applies every kernel of `bank` to the N×Ns signal `f`.
///
/// # Arguments
/// * `graph`: The graph, with the artifacts required by `method` computed.
/// * `bank`: The kernels to apply. Must not be empty.
/// * `f`: The N×Ns signal, real or complex, in single or double precision.
/// * `method`: The filtering strategy.
///
/// # Returns
/// One N×Ns output per kernel, in the precision of `f`.
///
/// # Errors
/// * `Precondition` if the artifacts `method` relies on are missing.
/// * `Configuration` for an empty bank or an order below one.
/// * `DimensionMismatch` if `f` does not have N rows.
pub fn analysis<T: Scalar>(
    graph: &Graph,
    bank: &FilterBank,
    f: MatRef<'_, T>,
    method: FilterMethod,
) -> Result<Vec<Mat<T>>, GspError> {
    if bank.is_empty() {
        return Err(configuration("the filter bank holds no kernel."));
    }
    match method {
        FilterMethod::Exact => graph.fourier_basis()?.filter(bank, f),
        FilterMethod::Chebyshev { order } => {
            let l = graph.laplacian()?;
            if f.nrows() != graph.n_vertices() {
                return Err(dimension_mismatch("vertices", graph.n_vertices(), f.nrows()));
            }
            let lmax = graph.lmax()?;
            if lmax == 0.0 {
                // The Laplacian is zero, so h(L) = h(0) I.
                log::debug!("Spectrum collapsed to zero; filtering reduces to scaling.");
                let signal = widen(f);
                return Ok(bank
                    .kernels()
                    .iter()
                    .map(|kernel| {
                        let gain = kernel.evaluate(0.0);
                        let scaled = Mat::from_fn(signal.nrows(), signal.ncols(), |i, j| {
                            gain * signal[(i, j)]
                        });
                        narrow(scaled.as_ref())
                    })
                    .collect());
            }
            let coeffs = compute_cheby_coefficients(bank, order, lmax)?;
            apply_cheby_filter(l, coeffs.as_ref(), lmax, f)
        }
    }
}

fn single_output<T>(mut outputs: Vec<Mat<T>>) -> Result<Mat<T>, GspError> {
    outputs
        .pop()
        .ok_or_else(|| configuration("filtering produced no output."))
}

/// Filters `f` with a single kernel through the Fourier basis.
pub fn filter_exact<T: Scalar>(
    graph: &Graph,
    kernel: impl SpectralKernel + 'static,
    f: MatRef<'_, T>,
) -> Result<Mat<T>, GspError> {
    single_output(analysis(graph, &FilterBank::single(kernel), f, FilterMethod::Exact)?)
}

/// Filters `f` with a single kernel through a Chebyshev polynomial of order `order`.
pub fn filter_chebyshev<T: Scalar>(
    graph: &Graph,
    kernel: impl SpectralKernel + 'static,
    order: usize,
    f: MatRef<'_, T>,
) -> Result<Mat<T>, GspError> {
    let method = FilterMethod::Chebyshev { order };
    single_output(analysis(graph, &FilterBank::single(kernel), f, method)?)
}

/// Translates every kernel of `bank` to vertex `i`: `√N · h(L) δ_i`.
///
/// The result shows how the kernel spreads around `i` on the graph.
///
/// # Errors
/// Returns `Configuration` if `i` is not a vertex of the graph, plus the
/// errors of [`analysis`].
pub fn localize(
    graph: &Graph,
    bank: &FilterBank,
    i: usize,
    method: FilterMethod,
) -> Result<Vec<Mat<f64>>, GspError> {
    let n = graph.n_vertices();
    if i >= n {
        return Err(configuration(format!(
            "vertex {i} is out of range for a graph of {n} vertices."
        )));
    }
    let scale = (n as f64).sqrt();
    let delta = Mat::from_fn(n, 1, |row, _| if row == i { scale } else { 0.0 });
    analysis(graph, bank, delta.as_ref(), method)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::GspErrorKind, filters::Heat, laplacian::LaplacianType,
        utils::synthetic::ring_weights,
    };

    fn ring_graph(n: usize) -> Graph {
        let g = Graph::new(ring_weights(n).unwrap(), LaplacianType::Combinatorial).unwrap();
        g.compute_laplacian().unwrap();
        g
    }

    #[test]
    fn test_chebyshev_matches_exact_for_heat_kernel() {
        let g = ring_graph(16);
        let lmax = g.compute_fourier_basis().unwrap().lmax();
        let f = Mat::from_fn(16, 2, |i, j| ((i * (j + 1)) % 5) as f64);

        let heat = Heat::new(2.0, lmax).unwrap();
        let exact = filter_exact(&g, heat, f.as_ref()).unwrap();
        let approx = filter_chebyshev(&g, heat, 30, f.as_ref()).unwrap();
        assert!((&exact - &approx).norm_l2() / exact.norm_l2() < 1e-8);
    }

    #[test]
    fn test_exact_requires_basis() {
        let g = ring_graph(6);
        let f = Mat::<f64>::zeros(6, 1);
        let err = filter_exact(&g, |x: f64| x, f.as_ref()).unwrap_err();
        assert!(matches!(err.kind(), GspErrorKind::Precondition(_)));
    }

    #[test]
    fn test_chebyshev_on_zero_laplacian_scales_signal() {
        let g = Graph::new(ring_weights(5).unwrap(), LaplacianType::None).unwrap();
        g.compute_laplacian().unwrap();
        let f = Mat::from_fn(5, 1, |i, _| i as f64);
        let out = filter_chebyshev(&g, |x: f64| 3.0 + x, 10, f.as_ref()).unwrap();
        assert!((&out - &(Mat::from_fn(5, 1, |i, _| 3.0 * i as f64))).norm_l2() < 1e-15);
    }

    #[test]
    fn test_localized_heat_kernel_peaks_at_vertex() {
        let g = ring_graph(12);
        let lmax = g.compute_fourier_basis().unwrap().lmax();
        let bank = FilterBank::single(Heat::new(5.0, lmax).unwrap());
        let atoms = localize(&g, &bank, 3, FilterMethod::Exact).unwrap();
        let atom = &atoms[0];

        let peak = (0..12).max_by(|&a, &b| atom[(a, 0)].total_cmp(&atom[(b, 0)])).unwrap();
        assert_eq!(peak, 3);
        // By symmetry of the ring, both neighbours receive the same mass.
        assert!((atom[(2, 0)] - atom[(4, 0)]).abs() < 1e-12);
    }

    #[test]
    fn test_localize_rejects_unknown_vertex() {
        let g = ring_graph(4);
        let bank = FilterBank::single(|x: f64| x);
        let err = localize(&g, &bank, 4, FilterMethod::default()).unwrap_err();
        assert!(matches!(err.kind(), GspErrorKind::Configuration(_)));
    }
}
