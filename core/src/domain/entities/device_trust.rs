//! Device trust entity: a durable MFA-bypass token for one device.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Days from creation until a trust expires
pub const TRUST_EXPIRATION_DAYS: i64 = 30;

/// Device trust entity
///
/// The opaque trust token itself is never stored; only its SHA-256 hash is,
/// the same discipline applied to the device fingerprint (salted). The IP
/// address is informational and never enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceTrust {
    /// Unique identifier for the trust record
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// SHA-256 hex of the opaque trust token
    pub token_hash: String,

    /// Random salt mixed into the fingerprint hash
    pub fingerprint_salt: String,

    /// SHA-256 hex of salt || fingerprint
    pub fingerprint_hash: String,

    /// User-agent string presented when the trust was created
    pub user_agent: String,

    /// Client IP at creation time (informational only)
    pub ip_address: Option<String>,

    /// Timestamp when the trust was created
    pub created_at: DateTime<Utc>,

    /// Absolute expiry (creation + 30 days)
    pub expires_at: DateTime<Utc>,

    /// When the trust last bypassed MFA
    pub last_used_at: DateTime<Utc>,

    /// Lifetime in seconds, kept alongside the absolute expiry
    pub ttl_seconds: i64,
}

impl DeviceTrust {
    /// Create a new trust record for a hashed token.
    pub fn new(
        id: Uuid,
        user_id: Uuid,
        token_hash: String,
        fingerprint_salt: String,
        fingerprint: &str,
        user_agent: String,
        ip_address: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let ttl = Duration::days(TRUST_EXPIRATION_DAYS);
        let fingerprint_hash = Self::hash_fingerprint(&fingerprint_salt, fingerprint);
        Self {
            id,
            user_id,
            token_hash,
            fingerprint_salt,
            fingerprint_hash,
            user_agent,
            ip_address,
            created_at: now,
            expires_at: now + ttl,
            last_used_at: now,
            ttl_seconds: ttl.num_seconds(),
        }
    }

    /// Salted fingerprint hash: SHA-256 hex of salt || fingerprint.
    pub fn hash_fingerprint(salt: &str, fingerprint: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(fingerprint.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// A trust is live only while `now < expires_at`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the presented device matches this trust.
    ///
    /// The fingerprint comparison is constant-time; the user-agent must
    /// match exactly.
    pub fn matches_device(&self, fingerprint: &str, user_agent: &str) -> bool {
        let presented = Self::hash_fingerprint(&self.fingerprint_salt, fingerprint);
        constant_time_eq(presented.as_bytes(), self.fingerprint_hash.as_bytes())
            && self.user_agent == user_agent
    }

    /// Successor snapshot with `last_used_at` moved to `now`.
    pub fn touched(&self, now: DateTime<Utc>) -> Self {
        Self {
            last_used_at: now,
            ..self.clone()
        }
    }
}
