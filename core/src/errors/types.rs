//! MFA-specific error types.
//!
//! These represent policy rejections and collaborator failures during
//! challenge creation and signin. Presentation concerns (wire formats,
//! localization) are handled by the caller.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised by the challenge engine and signin orchestration
#[derive(Error, Debug)]
pub enum MfaError {
    /// SMS send throttled; carries the instant at which a send becomes
    /// allowed again.
    #[error("SMS rate limit exceeded, retry at {retry_at}")]
    RateLimited { retry_at: DateTime<Utc> },

    #[error("SMS delivery failure")]
    SmsDeliveryFailure,

    #[error("TOTP secret is not valid base32")]
    InvalidTotpSecret,

    #[error("No TOTP secret is enrolled for this user")]
    MissingTotpSecret,

    #[error("Session issuance failed: {message}")]
    SessionIssuanceFailed { message: String },
}
