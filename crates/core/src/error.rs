//! Domain error model.

use thiserror::Error;

use crate::validation::FieldViolation;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant except `Store` is an expected, client-recoverable outcome and is
/// translated into a structured response at the HTTP boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// One or more request fields failed validation.
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldViolation>),

    /// A referenced object does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The persistence layer rejected a write because of a uniqueness constraint.
    ///
    /// Carries the backend's conflict text, which names the violated key.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// Any other persistence failure.
    #[error("store error: {0}")]
    Store(String),
}

impl DomainError {
    /// Not-found error with the message format clients rely on:
    /// `Object not found. Id: <id>, Type: <type_name>`.
    pub fn object_not_found(id: impl core::fmt::Display, type_name: &str) -> Self {
        Self::NotFound(format!("Object not found. Id: {id}, Type: {type_name}"))
    }

    pub fn duplicate_key(msg: impl Into<String>) -> Self {
        Self::DuplicateKey(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }
}
