//! Value objects representing immutable domain concepts.

pub mod outcomes;

// Re-export commonly used types
pub use outcomes::{
    BeginMfaOutcome, ChallengeCreated, ChallengeVerification, DeviceContext, DeviceView,
    VerifiedIdentity, VerifyMfaOutcome,
};
