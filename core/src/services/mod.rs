//! Business services containing the challenge engine and trust store.

pub mod challenge;
pub mod events;
pub mod rate_limit;
pub mod replay;
pub mod signin;
pub mod totp;
pub mod trust;

// Re-export commonly used types
pub use challenge::{ChallengeConfig, ChallengeService, SmsSender, TotpSecretProvider};
pub use events::{EventPublisher, NoOpEventPublisher};
pub use rate_limit::{SmsRateLimitConfig, SmsRateLimiter};
pub use replay::{MarkUsed, ReplayGuard};
pub use signin::{SessionIssuer, SigninService};
pub use totp::{TotpConfig, TotpVerifier};
pub use trust::{CreatedTrust, DeviceTrustConfig, DeviceTrustService};
