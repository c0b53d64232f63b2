//! Domain error types.

use common::ErrorCode;
use thiserror::Error;

/// Errors returned by the record stores.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// No record exists under the given id.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// The request is malformed, or the record belongs to another order.
    #[error("{0}")]
    InvalidArgument(String),

    /// An external dependency refused the request.
    #[error("{0}")]
    Unavailable(String),
}

impl DomainError {
    pub(crate) fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        DomainError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Returns the wire error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::NotFound { .. } => ErrorCode::NotFound,
            DomainError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            DomainError::Unavailable(_) => ErrorCode::Unavailable,
        }
    }
}

/// Convenience type alias for store results.
pub type Result<T> = std::result::Result<T, DomainError>;
