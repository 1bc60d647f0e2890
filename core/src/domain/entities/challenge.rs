//! MFA challenge entity: one in-flight verification attempt.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of verification attempts allowed per challenge
pub const MAX_ATTEMPTS: u32 = 3;

/// Length of an SMS verification code
pub const SMS_CODE_LENGTH: usize = 6;

/// Minutes from creation until a challenge expires
pub const CHALLENGE_EXPIRATION_MINUTES: i64 = 5;

/// Second factor used for a challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MfaMethod {
    Totp,
    Sms,
}

impl MfaMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Totp => "TOTP",
            Self::Sms => "SMS",
        }
    }
}

/// Observable state of a challenge at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeState {
    /// Attempts remain and the expiry has not passed
    Active,
    /// The absolute expiry has passed
    Expired,
    /// The attempt budget is spent; terminal, pending deletion
    Exhausted,
}

/// Result of registering a failed verification attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureTransition {
    /// Attempts remain; persist this snapshot and let the user retry
    Retry(MfaChallenge),
    /// The attempt budget is now spent; persist this snapshot as a
    /// terminal tombstone and report expiry
    Exhausted(MfaChallenge),
}

/// MFA challenge entity
///
/// Snapshots are immutable: state changes go through transition methods
/// that return a new snapshot, which the repository then applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MfaChallenge {
    /// Opaque, unguessable challenge token
    pub token: String,

    /// Owning user
    pub user_id: Uuid,

    /// Second factor this challenge verifies
    pub method: MfaMethod,

    /// Number of failed verification attempts so far
    pub attempts: u32,

    /// Attempt budget
    pub max_attempts: u32,

    /// Timestamp when the challenge was created
    pub created_at: DateTime<Utc>,

    /// Absolute expiry (creation + 5 minutes)
    pub expires_at: DateTime<Utc>,

    /// SHA-256 hex of the dispatched SMS code; `None` for TOTP
    pub sms_code_hash: Option<String>,

    /// When the SMS code was last dispatched (resend cooldown)
    pub last_sent_at: Option<DateTime<Utc>>,
}

impl MfaChallenge {
    /// Create a new TOTP challenge.
    pub fn new_totp(token: String, user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            token,
            user_id,
            method: MfaMethod::Totp,
            attempts: 0,
            max_attempts: MAX_ATTEMPTS,
            created_at: now,
            expires_at: now + Duration::minutes(CHALLENGE_EXPIRATION_MINUTES),
            sms_code_hash: None,
            last_sent_at: None,
        }
    }

    /// Create a new SMS challenge carrying the hash of the dispatched code.
    pub fn new_sms(token: String, user_id: Uuid, code_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            token,
            user_id,
            method: MfaMethod::Sms,
            attempts: 0,
            max_attempts: MAX_ATTEMPTS,
            created_at: now,
            expires_at: now + Duration::minutes(CHALLENGE_EXPIRATION_MINUTES),
            sms_code_hash: Some(code_hash),
            last_sent_at: Some(now),
        }
    }

    /// State of this snapshot at `now`.
    ///
    /// Exhaustion wins over expiry so a spent challenge reports the same
    /// terminal state regardless of when it is next touched.
    pub fn state(&self, now: DateTime<Utc>) -> ChallengeState {
        if self.attempts >= self.max_attempts {
            ChallengeState::Exhausted
        } else if now >= self.expires_at {
            ChallengeState::Expired
        } else {
            ChallengeState::Active
        }
    }

    pub fn is_terminal(&self, now: DateTime<Utc>) -> bool {
        self.state(now) != ChallengeState::Active
    }

    /// Attempts left before the challenge exhausts (0 when spent).
    pub fn remaining_attempts(&self) -> u32 {
        self.max_attempts.saturating_sub(self.attempts)
    }

    /// Register one failed verification attempt, returning the successor
    /// snapshot. The counter never exceeds `max_attempts`.
    pub fn register_failure(&self) -> FailureTransition {
        let next = Self {
            attempts: (self.attempts + 1).min(self.max_attempts),
            ..self.clone()
        };
        if next.attempts >= next.max_attempts {
            FailureTransition::Exhausted(next)
        } else {
            FailureTransition::Retry(next)
        }
    }
}
