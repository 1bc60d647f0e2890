//! TOTP code generation and windowed validation.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use totp_rs::{Algorithm, Secret, TOTP};

use crate::errors::{DomainResult, MfaError};

use super::config::TotpConfig;

/// Verifier for time-based one-time passwords
///
/// Evaluation always happens against an explicit instant, so behavior is
/// deterministic under a fixed clock.
#[derive(Debug, Clone, Default)]
pub struct TotpVerifier {
    config: TotpConfig,
}

impl TotpVerifier {
    pub fn new(config: TotpConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TotpConfig {
        &self.config
    }

    /// Time step containing `at`.
    pub fn time_step(&self, at: DateTime<Utc>) -> i64 {
        at.timestamp().div_euclid(self.config.step_seconds)
    }

    /// Instant at which codes for `time_step` (plus drift tolerance) stop
    /// being acceptable. Replay records live until then.
    pub fn step_window_end(&self, time_step: i64) -> DateTime<Utc> {
        let end = (time_step + 1 + i64::from(self.config.window_steps)) * self.config.step_seconds;
        DateTime::from_timestamp(end, 0).unwrap_or_else(|| Utc::now() + Duration::minutes(5))
    }

    /// Generate the code for one specific time step.
    pub fn generate_code(&self, secret_base32: &str, time_step: i64) -> DomainResult<String> {
        let totp = self.build(secret_base32)?;
        let at = (time_step * self.config.step_seconds).max(0) as u64;
        Ok(totp.generate(at))
    }

    /// Find the time step within the drift window whose code matches the
    /// submission, if any. Comparison is constant-time per candidate step.
    pub fn matched_step(
        &self,
        secret_base32: &str,
        submitted: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<i64>> {
        if submitted.len() != self.config.digits || !submitted.chars().all(|c| c.is_ascii_digit()) {
            return Ok(None);
        }

        let current = self.time_step(now);
        let window = i64::from(self.config.window_steps);
        for step in (current - window)..=(current + window) {
            let expected = self.generate_code(secret_base32, step)?;
            if constant_time_eq(expected.as_bytes(), submitted.as_bytes()) {
                return Ok(Some(step));
            }
        }
        Ok(None)
    }

    /// Whether the submission is valid at `now` within the drift window.
    pub fn validate(
        &self,
        secret_base32: &str,
        submitted: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<bool> {
        Ok(self.matched_step(secret_base32, submitted, now)?.is_some())
    }

    fn build(&self, secret_base32: &str) -> DomainResult<TOTP> {
        let secret_bytes = Secret::Encoded(secret_base32.to_string())
            .to_bytes()
            .map_err(|_| MfaError::InvalidTotpSecret)?;

        // new_unchecked: widely deployed authenticator secrets are 80 bits,
        // below the 128-bit floor TOTP::new enforces.
        Ok(TOTP::new_unchecked(
            Algorithm::SHA1,
            self.config.digits,
            1,
            self.config.step_seconds.max(1) as u64,
            secret_bytes,
        ))
    }
}
