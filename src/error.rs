//! This module defines the custom error types for the library.
//!
//! Every failure that the spectral and differential operators can report is
//! collected into a single enum, [`GspErrorKind`], and surfaced through the
//! transparent wrapper [`GspError`].
//!
//! Using the [`thiserror`] crate allows us to create idiomatic error types with minimal
//! boilerplate. Note that [`faer::linalg::evd::EvdError`] and the sparse
//! `CreationError` do not implement the standard [`std::error::Error`] trait, so
//! they are captured by their `Debug` rendering.
//!
//! All errors are deterministic consequences of the inputs. None of them is
//! transient, so callers should never retry an operation that failed.
use thiserror::Error;

/// Represents all possible errors raised by the graph signal processing core.
#[derive(Error, Debug, Clone)]
#[error(transparent)]
pub struct GspError(#[from] GspErrorKind);

impl GspError {
    /// Returns the class of the error, for callers that need to branch on it.
    pub fn kind(&self) -> &GspErrorKind {
        &self.0
    }
}

/// The distinct kinds of errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GspErrorKind {
    /// An invalid parameter or policy was selected (unknown Laplacian type,
    /// polynomial order below one, empty filter bank, non-positive `lmax`).
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// An operation was invoked before the artifact it depends on was computed.
    #[error("Precondition not met: {0}")]
    Precondition(String),

    /// The row count of a signal does not match the vertex or edge count.
    #[error("Dimension mismatch: expected {expected} {domain}, but the input has {actual}.")]
    DimensionMismatch {
        domain: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The input is mathematically outside the domain of the operation.
    #[error("Domain error: {0}")]
    Domain(String),

    /// The operation is deliberately unsupported for this kind of graph.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Wraps an error originating from [`faer`]'s eigendecomposition module.
    #[error("A numerical error occurred during the eigendecomposition of the Laplacian: {0}")]
    Eigendecomposition(String),

    /// Wraps a failure to assemble a sparse matrix from triplets.
    #[error("Failed to assemble a sparse matrix: {0}")]
    SparseConstruction(String),
}

impl PartialEq for GspError {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl From<faer::linalg::evd::EvdError> for GspError {
    fn from(err: faer::linalg::evd::EvdError) -> Self {
        GspErrorKind::Eigendecomposition(format!("{err:?}")).into()
    }
}

// Shorthands used at the many validation sites across the crate.
pub(crate) fn configuration(msg: impl Into<String>) -> GspError {
    GspErrorKind::Configuration(msg.into()).into()
}

pub(crate) fn precondition(msg: impl Into<String>) -> GspError {
    GspErrorKind::Precondition(msg.into()).into()
}

pub(crate) fn domain(msg: impl Into<String>) -> GspError {
    GspErrorKind::Domain(msg.into()).into()
}

pub(crate) fn not_implemented(msg: impl Into<String>) -> GspError {
    GspErrorKind::NotImplemented(msg.into()).into()
}

pub(crate) fn dimension_mismatch(domain: &'static str, expected: usize, actual: usize) -> GspError {
    GspErrorKind::DimensionMismatch {
        domain,
        expected,
        actual,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_error_message() {
        let error = dimension_mismatch("vertices", 100, 99);
        let expected_message = "Dimension mismatch: expected 100 vertices, but the input has 99.";
        assert_eq!(error.to_string(), expected_message);
    }

    #[test]
    fn test_domain_error_message() {
        let error = domain("vertex 3 has zero degree.");
        assert_eq!(error.to_string(), "Domain error: vertex 3 has zero degree.");
        assert!(matches!(error.kind(), GspErrorKind::Domain(_)));
    }

    #[test]
    fn test_precondition_error_message() {
        let error = precondition("the Fourier basis has not been computed.");
        let expected_message = "Precondition not met: the Fourier basis has not been computed.";
        assert_eq!(error.to_string(), expected_message);
    }

    #[test]
    fn test_evd_error_message() {
        let evd_error = faer::linalg::evd::EvdError::NoConvergence;
        let error = GspError::from(evd_error);
        let expected_message = "A numerical error occurred during the eigendecomposition of the Laplacian: NoConvergence";
        assert_eq!(error.to_string(), expected_message);
    }

    #[test]
    fn test_errors_compare_by_kind() {
        assert_eq!(configuration("order"), configuration("order"));
        assert_ne!(configuration("order"), not_implemented("order"));
    }
}
