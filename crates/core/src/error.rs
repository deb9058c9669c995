//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Deterministic domain failure.
///
/// These are business-rule outcomes (bad input, broken invariant, stale
/// version), not infrastructure faults; storage and dispatch carry their own
/// error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input failed a structural or format check.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant would be broken (e.g. activating a node under an
    /// inactive ancestor).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier failed to parse.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The referenced aggregate does not exist.
    #[error("not found")]
    NotFound,

    /// Optimistic concurrency failure (stream head moved underneath the
    /// caller).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The acting principal may not perform this operation.
    #[error("unauthorized")]
    Unauthorized,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
