//! Domain Layer - Core Entity Trait and Errors
//!
//! Every persisted entity has a unique id and is thread-safe.
//! Failures are reported through a three-kind error so the transport layer
//! can map them to its own status codes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Core trait for all domain entities
pub trait Entity: Sized + Send + Sync + Clone {
    /// The type of the entity's unique identifier
    type Id: Copy + Eq + std::hash::Hash + Send + Sync;

    /// Returns the entity's unique identifier
    fn id(&self) -> Self::Id;
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum DomainError {
    /// Referenced item or container does not exist
    #[error("Not found: {0}")]
    NotFound(String),
    /// Out-of-range index, parentage mismatch, malformed numbers
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Unexpected failure from storage
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Kind tag of a [`DomainError`], without the message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    Internal,
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::NotFound(_) => ErrorKind::NotFound,
            DomainError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            DomainError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Human-readable message without the kind prefix
    pub fn message(&self) -> &str {
        match self {
            DomainError::NotFound(msg)
            | DomainError::InvalidArgument(msg)
            | DomainError::Internal(msg) => msg,
        }
    }

    /// Only storage failures are worth re-invoking; the operations recompute
    /// from a fresh read, so a retry of the whole call is safe.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DomainError::Internal(_))
    }
}

impl From<rusqlite::Error> for DomainError {
    fn from(e: rusqlite::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DomainError::not_found("card 7 not found");
        assert_eq!(err.to_string(), "Not found: card 7 not found");
        assert_eq!(err.message(), "card 7 not found");
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(DomainError::invalid("x").kind(), ErrorKind::InvalidArgument);
        assert_eq!(DomainError::internal("x").kind(), ErrorKind::Internal);
        assert_eq!(DomainError::not_found("x").kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_retryable() {
        assert!(DomainError::internal("disk gone").is_retryable());
        assert!(!DomainError::invalid("bad index").is_retryable());
        assert!(!DomainError::not_found("card 1").is_retryable());
    }

    #[test]
    fn test_sqlite_error_is_internal() {
        let err: DomainError = rusqlite::Error::QueryReturnedNoRows.into();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_error_serializes_with_kind() {
        let json = serde_json::to_value(DomainError::invalid("bad index")).unwrap();
        assert_eq!(json["InvalidArgument"], "bad index");
    }
}
