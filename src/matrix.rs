//! Signal precision and the sparse/dense plumbing shared by every operator.
//!
//! Graph signals are dense `faer` matrices: one row per vertex (or per edge)
//! and one column per stacked signal. Callers may work in single or double
//! precision, real or complex. Internally every operator computes in `f64`,
//! and the result is cast back to the scalar type of the input so that a
//! single-precision caller always receives single-precision output. The
//! [`Scalar`] trait formalizes this contract.
//!
//! Sparse operators (Laplacians, incidence matrices) are stored as
//! [`SparseColMat<usize, f64>`] and applied through `faer`'s matrix-free
//! [`LinOp`] interface, so the cost of a product scales with the number of
//! stored entries.

use crate::error::{GspError, GspErrorKind};
use faer::{
    Mat, MatRef, Par, c32, c64,
    dyn_stack::{MemBuffer, MemStack},
    matrix_free::LinOp,
    sparse::{SparseColMat, Triplet},
};

/// A scalar type that graph signals can be expressed in.
///
/// Implemented for `f32`, `f64`, [`c32`] and [`c64`]. Every operator in this
/// crate is real, so a complex signal is processed as its real and imaginary
/// parts side by side. Conversions are lossless for `f64`/`c64` and
/// round-to-nearest for `f32`/`c32`.
pub trait Scalar: Copy + Send + Sync + core::fmt::Debug + 'static {
    /// Whether values carry an imaginary part.
    const IS_COMPLEX: bool;

    /// The real part, widened to double precision.
    fn re(self) -> f64;

    /// The imaginary part, widened to double precision. Zero for real types.
    fn im(self) -> f64;

    /// Builds a value from double-precision parts. Real types drop `im`.
    fn from_parts(re: f64, im: f64) -> Self;
}

impl Scalar for f64 {
    const IS_COMPLEX: bool = false;

    #[inline]
    fn re(self) -> f64 {
        self
    }

    #[inline]
    fn im(self) -> f64 {
        0.0
    }

    #[inline]
    fn from_parts(re: f64, _im: f64) -> Self {
        re
    }
}

impl Scalar for f32 {
    const IS_COMPLEX: bool = false;

    #[inline]
    fn re(self) -> f64 {
        self as f64
    }

    #[inline]
    fn im(self) -> f64 {
        0.0
    }

    #[inline]
    fn from_parts(re: f64, _im: f64) -> Self {
        re as f32
    }
}

impl Scalar for c64 {
    const IS_COMPLEX: bool = true;

    #[inline]
    fn re(self) -> f64 {
        self.re
    }

    #[inline]
    fn im(self) -> f64 {
        self.im
    }

    #[inline]
    fn from_parts(re: f64, im: f64) -> Self {
        c64::new(re, im)
    }
}

impl Scalar for c32 {
    const IS_COMPLEX: bool = true;

    #[inline]
    fn re(self) -> f64 {
        self.re as f64
    }

    #[inline]
    fn im(self) -> f64 {
        self.im as f64
    }

    #[inline]
    fn from_parts(re: f64, im: f64) -> Self {
        c32::new(re as f32, im as f32)
    }
}

/// Widens a signal to `f64`.
///
/// Complex signals come back with twice as many columns: the real parts
/// first, then the imaginary parts. Any real operator applied column by column
/// to this layout acts on both parts at once.
pub(crate) fn widen<T: Scalar>(signal: MatRef<'_, T>) -> Mat<f64> {
    let (nrows, ncols) = (signal.nrows(), signal.ncols());
    if !T::IS_COMPLEX {
        return Mat::from_fn(nrows, ncols, |i, j| signal[(i, j)].re());
    }
    Mat::from_fn(nrows, 2 * ncols, |i, j| {
        if j < ncols {
            signal[(i, j)].re()
        } else {
            signal[(i, j - ncols)].im()
        }
    })
}

/// Casts a double-precision result laid out by [`widen`] back to the caller's
/// scalar type.
pub(crate) fn narrow<T: Scalar>(parts: MatRef<'_, f64>) -> Mat<T> {
    let nrows = parts.nrows();
    if !T::IS_COMPLEX {
        return Mat::from_fn(nrows, parts.ncols(), |i, j| T::from_parts(parts[(i, j)], 0.0));
    }
    let ncols = parts.ncols() / 2;
    Mat::from_fn(nrows, ncols, |i, j| {
        T::from_parts(parts[(i, j)], parts[(i, j + ncols)])
    })
}

/// Assembles a sparse matrix, mapping `faer`'s creation error into ours.
pub(crate) fn sparse_from_triplets(
    nrows: usize,
    ncols: usize,
    triplets: &[Triplet<usize, usize, f64>],
) -> Result<SparseColMat<usize, f64>, GspError> {
    SparseColMat::try_new_from_triplets(nrows, ncols, triplets)
        .map_err(|e| GspErrorKind::SparseConstruction(format!("{e:?}")).into())
}

/// Computes `op * rhs` for a sparse operator.
///
/// The product goes through [`LinOp::apply`], which writes into a
/// pre-allocated destination and only touches the stored entries of `op`.
pub(crate) fn sparse_apply(op: &SparseColMat<usize, f64>, rhs: MatRef<'_, f64>) -> Mat<f64> {
    let op = op.as_ref();
    let mut out = Mat::<f64>::zeros(op.nrows(), rhs.ncols());
    let mut mem = MemBuffer::new(op.apply_scratch(rhs.ncols(), Par::Seq));
    let stack = MemStack::new(&mut mem);
    op.apply(out.as_mut(), rhs, Par::Seq, stack);
    out
}

/// Expands a sparse matrix into its dense form. Duplicate entries are summed.
pub fn to_dense(a: &SparseColMat<usize, f64>) -> Mat<f64> {
    let mut dense = Mat::<f64>::zeros(a.nrows(), a.ncols());
    for triplet in a.triplet_iter() {
        dense.as_mut()[(triplet.row, triplet.col)] += *triplet.val;
    }
    dense
}

/// Checks `a == aᵗ` entrywise, relative to the largest magnitude in `a`.
pub(crate) fn is_symmetric(a: MatRef<'_, f64>, rel_tol: f64) -> bool {
    if a.nrows() != a.ncols() {
        return false;
    }
    let n = a.nrows();
    let mut scale = 0.0f64;
    for j in 0..n {
        for i in 0..n {
            scale = scale.max(a[(i, j)].abs());
        }
    }
    let tol = rel_tol * scale.max(1.0);
    for j in 0..n {
        for i in (j + 1)..n {
            if (a[(i, j)] - a[(j, i)]).abs() > tol {
                return false;
            }
        }
    }
    true
}
