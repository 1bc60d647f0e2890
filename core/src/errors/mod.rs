//! Domain-specific error types and error handling.
//!
//! Business outcomes of verification (wrong code, expiry, replay) are value
//! types in `domain::value_objects`, not errors. Only infrastructure faults
//! and policy rejections travel through `DomainError`.

mod types;

pub use types::MfaError;

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Conflict on {resource}")]
    Conflict { resource: String },

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Mfa(#[from] MfaError),
}

pub type DomainResult<T> = Result<T, DomainError>;
