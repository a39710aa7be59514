//! Low-level numerical kernels behind the spectral operators.
//!
//! ** NOTE: We recommend using [`crate::graph::Graph`] and [`crate::solvers`]
//! instead. These functions skip the artifact cache and the precondition checks
//! performed there, and are intended for callers that manage their own
//! Laplacians (for example a multiresolution layer working on reduced graphs).
//!
//! - [`eigen`]: full symmetric eigendecomposition with canonical ordering and sign.
//! - [`chebyshev`]: Chebyshev expansion coefficients and the three-term recurrence
//!   applied to graph signals.
//! - [`power`]: cheap estimation of the spectral radius of a sparse Laplacian.

pub mod chebyshev;
pub mod eigen;
pub mod power;
