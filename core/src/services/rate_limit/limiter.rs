//! Sliding-window SMS rate limiter.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::SmsSendRecord;
use crate::errors::DomainResult;
use crate::repositories::SmsSendRepository;

use super::config::SmsRateLimitConfig;

/// Per-user SMS send limiter over a trailing window
///
/// The window slides: a send is allowed only if fewer than `max_sends`
/// ledger entries fall inside the trailing window at the instant of the
/// check. There are no fixed buckets.
pub struct SmsRateLimiter<R: SmsSendRepository> {
    repository: Arc<R>,
    config: SmsRateLimitConfig,
}

impl<R: SmsSendRepository> SmsRateLimiter<R> {
    pub fn new(repository: Arc<R>, config: SmsRateLimitConfig) -> Self {
        Self { repository, config }
    }

    /// Sends still permitted inside the window ending at `now`.
    pub async fn remaining_sends(&self, user_id: Uuid, now: DateTime<Utc>) -> DomainResult<u32> {
        let cutoff = now - self.config.window();
        let used = self.repository.count_since(user_id, cutoff).await? as u32;
        Ok(self.config.max_sends.saturating_sub(used))
    }

    /// Record one dispatched SMS at `now`.
    pub async fn record_send(&self, user_id: Uuid, now: DateTime<Utc>) -> DomainResult<()> {
        self.repository.record(SmsSendRecord::new(user_id, now)).await
    }

    /// When the window next frees a slot: the oldest qualifying send plus
    /// the window length. `None` when the user is under the limit.
    pub async fn next_reset_time(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<DateTime<Utc>>> {
        if self.remaining_sends(user_id, now).await? > 0 {
            return Ok(None);
        }
        let cutoff = now - self.config.window();
        let oldest = self.repository.oldest_since(user_id, cutoff).await?;
        Ok(oldest.map(|sent_at| sent_at + self.config.window()))
    }

    /// Drop ledger entries that can no longer affect any window.
    pub async fn purge_stale(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        self.repository.delete_before(now - self.config.window()).await
    }
}
