//! Sliding-window rate limiting for SMS dispatch.

mod config;
mod limiter;

pub use config::SmsRateLimitConfig;
pub use limiter::SmsRateLimiter;
