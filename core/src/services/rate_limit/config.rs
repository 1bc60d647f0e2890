//! Configuration for the SMS rate limiter.

use chrono::Duration;

/// Configuration for the sliding-window SMS limiter
#[derive(Debug, Clone)]
pub struct SmsRateLimitConfig {
    /// Maximum sends per user inside the window
    pub max_sends: u32,
    /// Window length in minutes (trailing, ending at "now")
    pub window_minutes: i64,
}

impl SmsRateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::minutes(self.window_minutes)
    }
}

impl Default for SmsRateLimitConfig {
    fn default() -> Self {
        Self {
            max_sends: 3,
            window_minutes: 60,
        }
    }
}
