//! Error taxonomy shared by both solvers.
//!
//! Only [`Error::MalformedRequest`] and [`Error::UnsolvableCore`] are process-level
//! failures (non-zero exit, message on stderr). A problem that is correctly solved
//! to "no feasible solution" is never an [`Error`] — it is a normal `status: "infeasible"`
//! response built by the solver, because the certificate *is* the product.

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Process-level failures. See module docs for the feasibility/error distinction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The request JSON violated the schema or a structural invariant
    /// (e.g. `lo > hi`, a non-positive node cap, the sink listed as a source).
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// The LP backend returned a status other than optimal/infeasible, or
    /// exceeded its time budget, even after the driver's retries.
    #[error("solver core could not resolve problem: {0}")]
    UnsolvableCore(String),

    /// Dimension mismatch between two things expected to agree in size.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected size.
        expected: usize,
        /// Actual size.
        got: usize,
    },
}

impl Error {
    /// Build a [`Error::MalformedRequest`].
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedRequest(msg.into())
    }

    /// Build a [`Error::UnsolvableCore`].
    pub fn unsolvable(msg: impl Into<String>) -> Self {
        Self::UnsolvableCore(msg.into())
    }

    /// Build a [`Error::DimensionMismatch`].
    pub fn dimension_mismatch(expected: usize, got: usize) -> Self {
        Self::DimensionMismatch { expected, got }
    }
}
