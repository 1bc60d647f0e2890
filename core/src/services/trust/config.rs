//! Device trust configuration.

/// Tunables for the device trust store
///
/// The trust lifetime is an entity-level constant
/// ([`crate::domain::entities::TRUST_EXPIRATION_DAYS`]).
#[derive(Debug, Clone, Copy)]
pub struct DeviceTrustConfig {
    /// Live trusts a user may hold; the oldest is evicted at the cap
    pub max_per_user: usize,
}

impl Default for DeviceTrustConfig {
    fn default() -> Self {
        Self { max_per_user: 10 }
    }
}
