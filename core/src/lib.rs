//! # StepGate MFA Core
//!
//! Multi-factor authentication challenge engine and device-trust store used
//! during signin. This crate contains the challenge state machine, replay
//! prevention, SMS rate limiting, trust-token lifecycle, repository
//! interfaces, and error types. HTTP handling, credential verification,
//! session issuance, and delivery providers live outside and are reached
//! through the narrow traits in `services`.

pub mod clock;
pub mod domain;
pub mod errors;
pub mod ids;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::*;
pub use errors::*;
pub use ids::{RandomTokenSource, TokenSource};
pub use repositories::*;
pub use services::*;
