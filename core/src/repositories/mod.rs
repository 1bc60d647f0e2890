//! Persistence interfaces for the MFA core.
//!
//! Each seam is an `async_trait` the infrastructure layer implements
//! against its expiring key-value or row storage. The in-memory mock
//! implementations back the test suites and double as a reference for the
//! expected semantics (conflict on duplicate used-code tuples, per-user
//! secondary lookups for trusts); they are gated behind the `test-util`
//! feature so release builds do not carry them.

pub mod challenge;
pub mod device_trust;
pub mod sms_send;
pub mod used_code;

pub use challenge::ChallengeRepository;
pub use device_trust::DeviceTrustRepository;
pub use sms_send::SmsSendRepository;
pub use used_code::UsedCodeRepository;

#[cfg(any(test, feature = "test-util"))]
pub use challenge::MockChallengeRepository;
#[cfg(any(test, feature = "test-util"))]
pub use device_trust::MockDeviceTrustRepository;
#[cfg(any(test, feature = "test-util"))]
pub use sms_send::MockSmsSendRepository;
#[cfg(any(test, feature = "test-util"))]
pub use used_code::MockUsedCodeRepository;
