//! Collaborator seams for the challenge service.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::DomainResult;

/// Outbound SMS dispatch
///
/// The implementation owns phone-number resolution and the provider
/// integration; the challenge service hands over only the user and the
/// plaintext code.
#[async_trait]
pub trait SmsSender: Send + Sync {
    /// Dispatch a verification code, returning a provider message id.
    async fn send_code(&self, user_id: Uuid, code: &str) -> Result<String, String>;
}

/// Lookup of a user's enrolled TOTP secret
#[async_trait]
pub trait TotpSecretProvider: Send + Sync {
    /// The user's base32-encoded shared secret, `None` when not enrolled.
    async fn totp_secret(&self, user_id: Uuid) -> DomainResult<Option<String>>;
}
