//! Security-event facts emitted after state transitions.
//!
//! The transport (message bus, audit log) is an external sink; publishing
//! must never affect the correctness of the flow that produced the fact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entities::MfaMethod;

/// Why a verification attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationFailureKind {
    InvalidToken,
    Expired,
    InvalidCode,
    /// Replay attempt; logged distinctly for security monitoring
    CodeAlreadyUsed,
}

impl VerificationFailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Expired => "EXPIRED",
            Self::InvalidCode => "INVALID_CODE",
            Self::CodeAlreadyUsed => "CODE_ALREADY_USED",
        }
    }
}

/// Facts the core publishes to the external audit/event sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEvent {
    ChallengeInitiated {
        user_id: Uuid,
        method: MfaMethod,
        at: DateTime<Utc>,
    },
    VerificationSucceeded {
        user_id: Uuid,
        method: MfaMethod,
        at: DateTime<Utc>,
    },
    VerificationFailed {
        user_id: Option<Uuid>,
        kind: VerificationFailureKind,
        remaining_attempts: Option<u32>,
        at: DateTime<Utc>,
    },
    DeviceRemembered {
        user_id: Uuid,
        trust_id: Uuid,
        at: DateTime<Utc>,
    },
    DeviceRevoked {
        user_id: Uuid,
        /// `None` for revoke-all
        trust_id: Option<Uuid>,
        reason: String,
        at: DateTime<Utc>,
    },
}

impl AuthEvent {
    /// Short name for logging and storage.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ChallengeInitiated { .. } => "CHALLENGE_INITIATED",
            Self::VerificationSucceeded { .. } => "VERIFICATION_SUCCEEDED",
            Self::VerificationFailed { .. } => "VERIFICATION_FAILED",
            Self::DeviceRemembered { .. } => "DEVICE_REMEMBERED",
            Self::DeviceRevoked { .. } => "DEVICE_REVOKED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_a_type_tag() {
        let event = AuthEvent::VerificationFailed {
            user_id: None,
            kind: VerificationFailureKind::CodeAlreadyUsed,
            remaining_attempts: Some(1),
            at: Utc::now(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "VERIFICATION_FAILED");
        assert_eq!(json["kind"], "CODE_ALREADY_USED");
        assert_eq!(event.kind(), "VERIFICATION_FAILED");
    }
}
