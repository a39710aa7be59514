//! Spectral kernels, filter banks and the checked Chebyshev filtering API.
//!
//! A spectral kernel is a scalar function `h(λ)` of the Laplacian eigenvalues.
//! Filtering a signal `f` with `h` means computing `h(L) f`. This can be done
//! exactly through the Fourier basis (see [`crate::fourier::FourierBasis::filter`])
//! or approximately with a Chebyshev polynomial in `L`, which is what
//! [`compute_cheby_coefficients`] and [`apply_cheby_filter`] provide.
//!
//! Several kernels are grouped in a [`FilterBank`]. Chebyshev coefficients of a
//! bank are laid out as an `(m+1) × Nf` table, one column per kernel.

use crate::{
    algorithms::chebyshev::{cheby_coefficients, cheby_recurrence},
    error::{GspError, configuration, dimension_mismatch},
    matrix::{Scalar, narrow, widen},
};
use faer::{Mat, MatRef, sparse::SparseColMat};
use std::fmt;

/// Default polynomial order for Chebyshev approximations.
pub const DEFAULT_CHEBY_ORDER: usize = 30;

/// A scalar function of the graph spectrum.
///
/// Any `Fn(f64) -> f64 + Send + Sync` closure is a kernel.
pub trait SpectralKernel: Send + Sync {
    /// Evaluates the kernel at one eigenvalue.
    fn evaluate(&self, lambda: f64) -> f64;

    /// Samples the response curve of the kernel, one value per input eigenvalue.
    fn evaluate_many(&self, lambdas: &[f64]) -> Vec<f64> {
        lambdas.iter().map(|&lambda| self.evaluate(lambda)).collect()
    }
}

impl<F> SpectralKernel for F
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    #[inline]
    fn evaluate(&self, lambda: f64) -> f64 {
        self(lambda)
    }
}

/// Heat diffusion kernel `h(λ) = exp(-τ λ / lmax)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heat {
    tau: f64,
    lmax: f64,
}

impl Heat {
    /// Creates a heat kernel with diffusion time `tau` on a spectrum bounded by `lmax`.
    ///
    /// # Errors
    /// Returns a `Configuration` error if `lmax` is not a finite positive number.
    pub fn new(tau: f64, lmax: f64) -> Result<Self, GspError> {
        check_lmax(lmax)?;
        Ok(Self { tau, lmax })
    }

    /// The diffusion time.
    pub fn tau(&self) -> f64 {
        self.tau
    }
}

impl SpectralKernel for Heat {
    fn evaluate(&self, lambda: f64) -> f64 {
        (-self.tau * lambda / self.lmax).exp()
    }
}

/// An ordered collection of spectral kernels applied side by side.
#[derive(Default)]
pub struct FilterBank {
    kernels: Vec<Box<dyn SpectralKernel>>,
}

impl FilterBank {
    /// An empty bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// A bank holding a single kernel.
    pub fn single(kernel: impl SpectralKernel + 'static) -> Self {
        Self::new().with(kernel)
    }

    /// Appends a kernel, builder style.
    pub fn with(mut self, kernel: impl SpectralKernel + 'static) -> Self {
        self.push(kernel);
        self
    }

    /// Appends a kernel in place.
    pub fn push(&mut self, kernel: impl SpectralKernel + 'static) {
        self.kernels.push(Box::new(kernel));
    }

    /// The number of kernels.
    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    /// Whether the bank holds no kernel.
    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }

    /// The kernels, in insertion order. Output `k` of a filtering call
    /// belongs to `kernels()[k]`.
    pub fn kernels(&self) -> &[Box<dyn SpectralKernel>] {
        &self.kernels
    }

    /// Samples every kernel: entry `(i, k)` is `h_k(lambdas[i])`.
    pub fn evaluate(&self, lambdas: &[f64]) -> Mat<f64> {
        Mat::from_fn(lambdas.len(), self.kernels.len(), |i, k| {
            self.kernels[k].evaluate(lambdas[i])
        })
    }
}

impl fmt::Debug for FilterBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterBank")
            .field("kernels", &self.kernels.len())
            .finish()
    }
}

pub(crate) fn check_lmax(lmax: f64) -> Result<(), GspError> {
    if !lmax.is_finite() || lmax <= 0.0 {
        return Err(configuration(format!(
            "lmax must be a finite positive number, got {lmax}."
        )));
    }
    Ok(())
}

fn check_order(order: usize) -> Result<(), GspError> {
    if order < 1 {
        return Err(configuration("the Chebyshev order must be at least 1."));
    }
    Ok(())
}

/// Computes the Chebyshev coefficients of every kernel in `bank` on `[0, lmax]`.
///
/// # Arguments
/// * `bank`: The kernels to approximate. Must not be empty.
/// * `order`: The polynomial order `m`. Must be at least 1.
/// * `lmax`: The upper end of the spectrum. Must be positive.
///
/// # Returns
/// An `(m+1) × Nf` table; column `k` holds the coefficients of kernel `k`.
pub fn compute_cheby_coefficients(
    bank: &FilterBank,
    order: usize,
    lmax: f64,
) -> Result<Mat<f64>, GspError> {
    check_order(order)?;
    check_lmax(lmax)?;
    if bank.is_empty() {
        return Err(configuration("the filter bank holds no kernel."));
    }

    let columns: Vec<Vec<f64>> = bank
        .kernels()
        .iter()
        .map(|kernel| cheby_coefficients(|x| kernel.evaluate(x), order, lmax))
        .collect();
    Ok(Mat::from_fn(order + 1, columns.len(), |k, j| columns[j][k]))
}

/// Applies a Chebyshev-approximated filter bank to a signal.
///
/// # Arguments
/// * `l`: The sparse N×N Laplacian.
/// * `coeffs`: An `(m+1) × Nf` coefficient table from [`compute_cheby_coefficients`].
/// * `lmax`: The interval bound the coefficients were computed for.
/// * `f`: The N×Ns signal, real or complex, in single or double precision.
///
/// # Returns
/// One N×Ns output per kernel, in the precision of `f`.
///
/// # Errors
/// * `Configuration` if the table has fewer than two rows or no column, or
///   if `lmax` is not positive.
/// * `DimensionMismatch` if `f` does not have N rows.
pub fn apply_cheby_filter<T: Scalar>(
    l: &SparseColMat<usize, f64>,
    coeffs: MatRef<'_, f64>,
    lmax: f64,
    f: MatRef<'_, T>,
) -> Result<Vec<Mat<T>>, GspError> {
    check_order(coeffs.nrows().saturating_sub(1))?;
    check_lmax(lmax)?;
    if coeffs.ncols() == 0 {
        return Err(configuration("the coefficient table holds no filter."));
    }
    if f.nrows() != l.nrows() {
        return Err(dimension_mismatch("vertices", l.nrows(), f.nrows()));
    }

    let signal = widen(f);
    (0..coeffs.ncols())
        .map(|j| {
            let column: Vec<f64> = (0..coeffs.nrows()).map(|k| coeffs[(k, j)]).collect();
            let filtered = cheby_recurrence(l, &column, lmax, signal.as_ref())?;
            Ok(narrow(filtered.as_ref()))
        })
        .collect()
}
