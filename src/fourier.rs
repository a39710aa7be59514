//! The graph Fourier basis and the graph Fourier transform.
//!
//! The eigenvectors of the Laplacian, ordered by eigenvalue, play the role of
//! Fourier modes: low eigenvalues correspond to smooth signals, high
//! eigenvalues to signals that oscillate across edges. The forward transform
//! projects a vertex signal onto this basis, `f̂ = Uᴴ f`, and the inverse
//! transform synthesizes it back, `f = U f̂`. `U` is real, so `Uᴴ = Uᵗ` and a
//! complex signal transforms part by part.

use crate::{
    algorithms::eigen::{full_eigen, max_abs},
    error::{GspError, dimension_mismatch},
    filters::FilterBank,
    matrix::{Scalar, narrow, widen},
};
use faer::{Mat, MatRef, sparse::SparseColMat};

/// The full spectral decomposition of a Laplacian.
///
/// Invariants: eigenvalues are ascending, eigenvector columns are orthonormal
/// and sign-canonical (first non-negligible entry nonnegative).
#[derive(Debug, Clone)]
pub struct FourierBasis {
    e: Vec<f64>,
    u: Mat<f64>,
    lmax: f64,
    mu: f64,
}

/// Computes the graph Fourier basis of the Laplacian `l`.
///
/// Repeated calls on the same Laplacian produce bit-identical results.
///
/// # Errors
/// * `Domain` if `l` is not symmetric.
/// * `Eigendecomposition` if the dense eigensolver fails.
pub fn compute_fourier_basis(l: &SparseColMat<usize, f64>) -> Result<FourierBasis, GspError> {
    let pairs = full_eigen(l)?;
    let lmax = pairs.eigenvalues.last().copied().unwrap_or(0.0);
    let mu = max_abs(&pairs.eigenvectors);
    log::debug!(
        "Computed Fourier basis of size {} (lmax = {lmax:.6}, mu = {mu:.6}).",
        pairs.eigenvalues.len()
    );
    Ok(FourierBasis {
        e: pairs.eigenvalues,
        u: pairs.eigenvectors,
        lmax,
        mu,
    })
}

impl FourierBasis {
    /// Number of vertices (and of Fourier modes).
    pub fn n_vertices(&self) -> usize {
        self.e.len()
    }

    /// The eigenvalues `e`, in ascending order.
    pub fn eigenvalues(&self) -> &[f64] {
        &self.e
    }

    /// The eigenvector matrix `U`; column `k` is paired with `e[k]`.
    pub fn eigenvectors(&self) -> MatRef<'_, f64> {
        self.u.as_ref()
    }

    /// The largest eigenvalue.
    pub fn lmax(&self) -> f64 {
        self.lmax
    }

    /// The largest absolute entry of `U`.
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Forward transform `Uᵗ f`.
    pub fn gft<T: Scalar>(&self, f: MatRef<'_, T>) -> Result<Mat<T>, GspError> {
        gft(self.u.as_ref(), f)
    }

    /// Inverse transform `U f̂`.
    pub fn igft<T: Scalar>(&self, f_hat: MatRef<'_, T>) -> Result<Mat<T>, GspError> {
        igft(self.u.as_ref(), f_hat)
    }

    /// Filters `f` exactly with every kernel of `bank`: `U diag(h(e)) Uᵗ f`.
    ///
    /// Returns one output per kernel, in the precision of `f`.
    pub fn filter<T: Scalar>(
        &self,
        bank: &FilterBank,
        f: MatRef<'_, T>,
    ) -> Result<Vec<Mat<T>>, GspError> {
        let n = self.n_vertices();
        if f.nrows() != n {
            return Err(dimension_mismatch("vertices", n, f.nrows()));
        }
        let coefficients = self.u.as_ref().transpose() * widen(f).as_ref();
        let response = bank.evaluate(&self.e);

        let outputs = (0..bank.len())
            .map(|k| {
                let scaled = Mat::from_fn(n, coefficients.ncols(), |i, j| {
                    response[(i, k)] * coefficients[(i, j)]
                });
                let filtered = &self.u * &scaled;
                narrow(filtered.as_ref())
            })
            .collect();
        Ok(outputs)
    }
}

/// Graph Fourier transform `f̂ = Uᴴ f` of an N×Ns real or complex signal.
///
/// # Errors
/// Returns `DimensionMismatch` if `f` does not have as many rows as `u`.
pub fn gft<T: Scalar>(u: MatRef<'_, f64>, f: MatRef<'_, T>) -> Result<Mat<T>, GspError> {
    if f.nrows() != u.nrows() {
        return Err(dimension_mismatch("vertices", u.nrows(), f.nrows()));
    }
    let f_hat = u.transpose() * widen(f).as_ref();
    Ok(narrow(f_hat.as_ref()))
}

/// Inverse graph Fourier transform `f = U f̂`.
///
/// # Errors
/// Returns `DimensionMismatch` if `f_hat` does not have as many rows as `u` has columns.
pub fn igft<T: Scalar>(u: MatRef<'_, f64>, f_hat: MatRef<'_, T>) -> Result<Mat<T>, GspError> {
    if f_hat.nrows() != u.ncols() {
        return Err(dimension_mismatch("Fourier coefficients", u.ncols(), f_hat.nrows()));
    }
    let f = u * widen(f_hat).as_ref();
    Ok(narrow(f.as_ref()))
}
