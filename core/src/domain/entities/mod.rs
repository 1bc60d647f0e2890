//! Domain entities representing the MFA and device-trust records.

pub mod challenge;
pub mod device_trust;
pub mod sms_send;
pub mod used_code;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use challenge::{
    ChallengeState, FailureTransition, MfaChallenge, MfaMethod, CHALLENGE_EXPIRATION_MINUTES,
    MAX_ATTEMPTS, SMS_CODE_LENGTH,
};
pub use device_trust::{DeviceTrust, TRUST_EXPIRATION_DAYS};
pub use sms_send::SmsSendRecord;
pub use used_code::UsedOneTimeCode;
