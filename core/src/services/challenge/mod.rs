//! MFA challenge lifecycle: creation, verification, hygiene.

mod config;
mod service;
mod traits;

pub use config::ChallengeConfig;
pub use service::ChallengeService;
pub use traits::{SmsSender, TotpSecretProvider};

#[cfg(test)]
pub(crate) mod tests_support;

#[cfg(test)]
mod tests;
