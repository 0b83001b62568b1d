//! Domain errors for CivicOps

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("{reason}")]
    ValidationError { field: String, reason: String },

    #[error("Invalid identifier: {reason}")]
    InvalidIdentifier { reason: String },
}

impl DomainError {
    /// Create a validation error for a named field
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
