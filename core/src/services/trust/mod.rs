//! Device trust: remembered devices that bypass MFA.

mod config;
mod service;

pub use config::DeviceTrustConfig;
pub use service::{CreatedTrust, DeviceTrustService};
