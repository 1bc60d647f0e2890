//! SMS rate-limit ledger entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One SMS dispatch that passed the limiter.
///
/// The sliding-window limiter counts these per user over the trailing hour;
/// entries older than the window are purged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsSendRecord {
    /// User the SMS was sent for
    pub user_id: Uuid,

    /// When the send happened
    pub sent_at: DateTime<Utc>,
}

impl SmsSendRecord {
    pub fn new(user_id: Uuid, sent_at: DateTime<Utc>) -> Self {
        Self { user_id, sent_at }
    }
}
