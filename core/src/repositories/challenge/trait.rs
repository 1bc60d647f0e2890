//! Challenge repository trait defining the interface for challenge persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::MfaChallenge;
use crate::errors::DomainError;

/// Repository trait for MfaChallenge persistence
///
/// Challenges are addressed by their opaque token and secondarily by owning
/// user. Storage needs per-record TTL semantics; expired rows are also
/// removed lazily by the service and by the periodic sweep.
#[async_trait]
pub trait ChallengeRepository: Send + Sync {
    /// Persist a freshly created challenge.
    async fn insert(&self, challenge: MfaChallenge) -> Result<(), DomainError>;

    /// Look up a challenge by its token.
    async fn find_by_token(&self, token: &str) -> Result<Option<MfaChallenge>, DomainError>;

    /// All challenges currently stored for a user.
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<MfaChallenge>, DomainError>;

    /// Apply an updated snapshot (attempt counter increment).
    ///
    /// # Returns
    /// * `Ok(())` - Snapshot applied
    /// * `Err(DomainError::NotFound)` - The challenge no longer exists
    async fn update(&self, challenge: MfaChallenge) -> Result<(), DomainError>;

    /// Delete a challenge by token.
    ///
    /// # Returns
    /// * `Ok(true)` - A row was deleted
    /// * `Ok(false)` - No such token
    async fn delete_by_token(&self, token: &str) -> Result<bool, DomainError>;

    /// Delete every challenge belonging to a user, returning the count.
    ///
    /// Called at challenge creation to enforce the one-live-challenge
    /// invariant.
    async fn delete_for_user(&self, user_id: Uuid) -> Result<usize, DomainError>;

    /// Delete terminal rows (expired or exhausted) for storage hygiene.
    async fn delete_terminal(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;
}
