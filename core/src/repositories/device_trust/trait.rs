//! Device trust repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::DeviceTrust;
use crate::errors::DomainError;

/// Repository trait for DeviceTrust persistence
///
/// Trusts are addressed by the hash of their opaque token and secondarily
/// by owning user (the per-user index backs the capacity bound and
/// eviction). Implementations should index both.
#[async_trait]
pub trait DeviceTrustRepository: Send + Sync {
    /// Persist a new trust.
    async fn insert(&self, trust: DeviceTrust) -> Result<(), DomainError>;

    /// Look up a trust by the SHA-256 hash of its token.
    async fn find_by_token_hash(&self, token_hash: &str)
        -> Result<Option<DeviceTrust>, DomainError>;

    /// Look up a trust by record id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<DeviceTrust>, DomainError>;

    /// All trusts stored for a user, expired rows included.
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<DeviceTrust>, DomainError>;

    /// Apply an updated snapshot (`last_used_at` bump).
    async fn update(&self, trust: DeviceTrust) -> Result<(), DomainError>;

    /// Delete by record id.
    ///
    /// # Returns
    /// * `Ok(true)` - A row was deleted
    /// * `Ok(false)` - No such trust
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Delete every trust for a user, returning the count.
    async fn delete_for_user(&self, user_id: Uuid) -> Result<usize, DomainError>;

    /// Delete expired rows for storage hygiene.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;

    /// Count live (non-expired) trusts for a user.
    async fn count_live_for_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<usize, DomainError> {
        Ok(self
            .find_by_user(user_id)
            .await?
            .iter()
            .filter(|t| !t.is_expired(now))
            .count())
    }

    /// Oldest live trust for a user by creation time (eviction candidate).
    ///
    /// Expired rows are excluded: they do not count against the cap, so
    /// evicting one would let the live count grow past it.
    async fn find_oldest_for_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<DeviceTrust>, DomainError> {
        let mut trusts: Vec<DeviceTrust> = self
            .find_by_user(user_id)
            .await?
            .into_iter()
            .filter(|t| !t.is_expired(now))
            .collect();
        trusts.sort_by_key(|t| t.created_at);
        Ok(trusts.into_iter().next())
    }
}
