//! Used one-time code persistence (replay ledger).

pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;

#[cfg(any(test, feature = "test-util"))]
pub mod mock;

#[cfg(any(test, feature = "test-util"))]
pub use mock::MockUsedCodeRepository;
pub use r#trait::UsedCodeRepository;

#[cfg(test)]
mod tests;
