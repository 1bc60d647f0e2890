//! Replay-prevention record for consumed one-time codes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A one-time code that has been accepted once and must never be again.
///
/// Only the SHA-256 hash of the code is recorded, never the raw digits.
/// The tuple (user, code hash, time step) is unique; the repository rejects
/// duplicate inserts with a conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsedOneTimeCode {
    /// User who consumed the code
    pub user_id: Uuid,

    /// SHA-256 hex of the submitted code
    pub code_hash: String,

    /// TOTP time step the code was valid for
    pub time_step: i64,

    /// When the record can be garbage-collected (aligned to the code's
    /// validity window)
    pub expires_at: DateTime<Utc>,
}

impl UsedOneTimeCode {
    pub fn new(
        user_id: Uuid,
        code_hash: String,
        time_step: i64,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            code_hash,
            time_step,
            expires_at,
        }
    }

    /// Uniqueness key for the (user, code hash, time step) tuple.
    pub fn key(&self) -> (Uuid, String, i64) {
        (self.user_id, self.code_hash.clone(), self.time_step)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
