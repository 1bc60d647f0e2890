//! Time-based one-time password verification (RFC 6238).
//!
//! Pure functions of (secret, time, window): no persistence, no ambient
//! clock. Replay prevention is the caller's concern (see
//! `services::replay`).

mod config;
mod verifier;

pub use config::TotpConfig;
pub use verifier::TotpVerifier;
