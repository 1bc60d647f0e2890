//! Result and input value types for the MFA flow.
//!
//! Every verification outcome is an expected business branch and is modeled
//! as an enum variant, never as an error; `match` on these is exhaustive by
//! construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::MfaMethod;

/// Identity handed over by the credential-verification collaborator
/// after the password check succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub user_id: Uuid,
    pub mfa_enabled: bool,
    pub mfa_method: MfaMethod,
}

/// Client device context accompanying a signin or verification request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceContext {
    /// Device-trust token from the client, if any
    pub trust_token: Option<String>,
    pub fingerprint: String,
    pub user_agent: String,
    pub ip_address: Option<String>,
}

/// Result of creating a challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeCreated {
    pub challenge_token: String,
    pub method: MfaMethod,
    pub expires_at: DateTime<Utc>,
    /// When another SMS may be requested; `None` for TOTP
    pub next_resend_at: Option<DateTime<Utc>>,
}

/// Outcome of verifying a challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeVerification {
    /// Correct code; the challenge has been consumed and deleted
    Success {
        user_id: Uuid,
        method: MfaMethod,
        remember_device: bool,
    },
    /// Unknown or malformed challenge token; non-retryable
    InvalidToken,
    /// Time or attempt exhaustion; the client must restart signin
    Expired,
    /// Wrong code; retryable while attempts remain
    InvalidCode { remaining_attempts: u32 },
    /// Replayed one-time code; retryable but logged distinctly
    CodeAlreadyUsed { remaining_attempts: u32 },
}

/// Outcome of `begin_mfa`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeginMfaOutcome {
    /// A valid device trust accompanied the request; MFA skipped
    DeviceTrustBypassed { session: String },
    /// The user has no second factor enrolled
    MfaNotRequired { session: String },
    /// MFA is required; no session until verification succeeds
    ChallengeRequired {
        challenge_token: String,
        method: MfaMethod,
        expires_at: DateTime<Utc>,
    },
}

/// Outcome of `verify_mfa`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyMfaOutcome {
    Success {
        user_id: Uuid,
        session: String,
        /// Minted when the client asked to remember this device
        device_trust_token: Option<String>,
    },
    InvalidToken,
    Expired,
    InvalidCode { remaining_attempts: u32 },
    CodeAlreadyUsed { remaining_attempts: u32 },
}

/// One remembered device, as exposed to device-management listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_used_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Whether this entry matches the trust token the client presented
    pub is_current: bool,
}
