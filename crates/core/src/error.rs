//! Shared error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic business failures (validation,
/// invariants). Workflow-specific failures such as the checkout taxonomy
/// carry their own error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
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
}

/// Storage-layer failure surfaced to repositories and orchestrators.
///
/// Concrete backends map their native errors into this type so domain code
/// never depends on a particular store.
#[derive(Debug, Error, Clone)]
pub enum StoreError {
    /// The backend could not be reached or a read/write failed.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A row-level constraint rejected the write (FK, CHECK, UNIQUE).
    #[error("constraint violated: {0}")]
    Constraint(String),

    /// The unit of work could not be committed.
    #[error("commit failed: {0}")]
    Commit(String),
}
