//! Domain error taxonomy

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Requested tariff key is absent from the registry. Never silently
    /// defaulted: the caller must surface an "invalid pricing profile"
    /// condition.
    #[error("Unknown tariff profile: {0}")]
    UnknownProfile(String),

    /// Negative elapsed duration (clock skew or bad input). Never clamped,
    /// since a silent clamp could misprice a transaction.
    #[error("Invalid stay interval: {0}")]
    InvalidInterval(String),

    #[error("Not found: {entity} {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
