//! Domain-level errors.

use thiserror::Error;

/// Errors raised by domain value objects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The password hasher failed to produce a hash
    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
