//! Replay guard over the used-code ledger.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::UsedOneTimeCode;
use crate::errors::{DomainError, DomainResult};
use crate::repositories::UsedCodeRepository;

/// Outcome of recording a consumed code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkUsed {
    /// The tuple was recorded; this request owns the code
    Recorded,
    /// The tuple already existed; a concurrent (or earlier) verification
    /// consumed the code first
    AlreadyUsed,
}

/// Guard answering "has this one-time code been consumed" per user and
/// time step.
pub struct ReplayGuard<U: UsedCodeRepository> {
    repository: Arc<U>,
}

impl<U: UsedCodeRepository> ReplayGuard<U> {
    pub fn new(repository: Arc<U>) -> Self {
        Self { repository }
    }

    /// Whether the (user, code hash, step) tuple is already recorded.
    pub async fn was_used(
        &self,
        user_id: Uuid,
        code_hash: &str,
        time_step: i64,
    ) -> DomainResult<bool> {
        self.repository.contains(user_id, code_hash, time_step).await
    }

    /// Record a consumed code.
    ///
    /// An insert conflict is reported as [`MarkUsed::AlreadyUsed`] rather
    /// than an error: two verification requests racing on the same code is
    /// an expected branch, and exactly one of them may win.
    pub async fn mark_used(
        &self,
        user_id: Uuid,
        code_hash: String,
        time_step: i64,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<MarkUsed> {
        let record = UsedOneTimeCode::new(user_id, code_hash, time_step, expires_at);
        match self.repository.insert(record).await {
            Ok(()) => Ok(MarkUsed::Recorded),
            Err(DomainError::Conflict { .. }) => {
                tracing::warn!(
                    user_id = %user_id,
                    time_step,
                    event = "otp_replay_race",
                    "One-time code already recorded as used"
                );
                Ok(MarkUsed::AlreadyUsed)
            }
            Err(e) => Err(e),
        }
    }

    /// Garbage-collect expired records. Safe to call from a periodic
    /// sweep; live records are never touched.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        let removed = self.repository.delete_expired(now).await?;
        if removed > 0 {
            tracing::debug!(removed, event = "used_code_purge", "Purged expired used-code records");
        }
        Ok(removed)
    }
}
