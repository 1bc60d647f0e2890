//! Challenge service configuration.

use chrono::Duration;

/// Tunables for the challenge service
///
/// Challenge expiry and the attempt budget are entity-level constants
/// ([`crate::domain::entities::CHALLENGE_EXPIRATION_MINUTES`],
/// [`crate::domain::entities::MAX_ATTEMPTS`]); this struct carries only the
/// dispatch-side knobs.
#[derive(Debug, Clone, Copy)]
pub struct ChallengeConfig {
    /// Seconds a user must wait between SMS code dispatches
    pub resend_cooldown_seconds: i64,
}

impl ChallengeConfig {
    pub fn resend_cooldown(&self) -> Duration {
        Duration::seconds(self.resend_cooldown_seconds)
    }
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            resend_cooldown_seconds: 60,
        }
    }
}
