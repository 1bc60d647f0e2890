//! SMS send-ledger repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::SmsSendRecord;
use crate::errors::DomainError;

/// Repository trait for the per-user SMS send ledger
#[async_trait]
pub trait SmsSendRepository: Send + Sync {
    /// Record one dispatched SMS.
    async fn record(&self, record: SmsSendRecord) -> Result<(), DomainError>;

    /// Sends for a user with `sent_at >= cutoff`, oldest first.
    async fn find_since(
        &self,
        user_id: Uuid,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<SmsSendRecord>, DomainError>;

    /// Purge records strictly older than `cutoff`.
    async fn delete_before(&self, cutoff: DateTime<Utc>) -> Result<usize, DomainError>;

    /// Number of sends inside the window.
    async fn count_since(&self, user_id: Uuid, cutoff: DateTime<Utc>) -> Result<usize, DomainError> {
        Ok(self.find_since(user_id, cutoff).await?.len())
    }

    /// Oldest send inside the window, if any.
    async fn oldest_since(
        &self,
        user_id: Uuid,
        cutoff: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, DomainError> {
        Ok(self
            .find_since(user_id, cutoff)
            .await?
            .first()
            .map(|r| r.sent_at))
    }
}
