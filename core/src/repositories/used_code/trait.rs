//! Used-code repository trait for the replay ledger.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::UsedOneTimeCode;
use crate::errors::DomainError;

/// Repository trait for consumed one-time codes
///
/// The (user, code hash, time step) tuple is unique. `insert` must surface
/// a duplicate as `DomainError::Conflict` rather than succeeding silently:
/// the caller treats that conflict as a verification race lost to another
/// request that already consumed the code.
#[async_trait]
pub trait UsedCodeRepository: Send + Sync {
    /// Record a consumed code.
    ///
    /// # Returns
    /// * `Ok(())` - Recorded
    /// * `Err(DomainError::Conflict)` - The tuple already exists
    async fn insert(&self, record: UsedOneTimeCode) -> Result<(), DomainError>;

    /// Whether the tuple is already recorded.
    async fn contains(
        &self,
        user_id: Uuid,
        code_hash: &str,
        time_step: i64,
    ) -> Result<bool, DomainError>;

    /// Garbage-collect records past their expiry. Live records are never
    /// removed.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;
}
