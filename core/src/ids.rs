//! Injected identifier and token generation.

use rand::rngs::OsRng;
use rand::RngCore;
use uuid::Uuid;

/// Length in bytes of opaque tokens (challenge and trust tokens).
pub const TOKEN_BYTES: usize = 32;

/// Source of unguessable tokens and record identifiers.
pub trait TokenSource: Send + Sync {
    /// Mint a new opaque token (hex-encoded random bytes).
    fn opaque_token(&self) -> String;

    /// Mint a new record identifier.
    fn new_id(&self) -> Uuid;
}

/// Production source using the OS CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTokenSource;

impl TokenSource for RandomTokenSource {
    fn opaque_token(&self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    fn new_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}
