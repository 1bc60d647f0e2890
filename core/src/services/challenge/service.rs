//! Challenge creation and verification.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;
use rand::rngs::OsRng;
use rand::Rng;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::clock::Clock;
use crate::domain::entities::{
    FailureTransition, MfaChallenge, MfaMethod, SMS_CODE_LENGTH,
};
use crate::domain::value_objects::{ChallengeCreated, ChallengeVerification};
use crate::errors::{DomainResult, MfaError};
use crate::ids::TokenSource;
use crate::repositories::{ChallengeRepository, SmsSendRepository, UsedCodeRepository};
use crate::services::rate_limit::SmsRateLimiter;
use crate::services::replay::{MarkUsed, ReplayGuard};
use crate::services::totp::TotpVerifier;

use super::config::ChallengeConfig;
use super::traits::{SmsSender, TotpSecretProvider};

/// SHA-256 hex digest of a one-time code.
pub(crate) fn hash_code(code: &str) -> String {
    hex::encode(Sha256::digest(code.as_bytes()))
}

/// Generate a random numeric SMS code.
fn generate_sms_code() -> String {
    let mut rng = OsRng;
    (0..SMS_CODE_LENGTH)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Challenge lifecycle service
///
/// Owns creation (including SMS throttling and dispatch) and verification
/// (including attempt accounting and TOTP replay protection). Each call is
/// one load-evaluate-persist pass over the challenge row; there is no
/// cross-call locking.
pub struct ChallengeService<C, U, R, S, P>
where
    C: ChallengeRepository,
    U: UsedCodeRepository,
    R: SmsSendRepository,
    S: SmsSender,
    P: TotpSecretProvider,
{
    challenges: Arc<C>,
    replay_guard: ReplayGuard<U>,
    rate_limiter: SmsRateLimiter<R>,
    sms_sender: Arc<S>,
    secret_provider: Arc<P>,
    totp: TotpVerifier,
    clock: Arc<dyn Clock>,
    tokens: Arc<dyn TokenSource>,
    config: ChallengeConfig,
}

impl<C, U, R, S, P> ChallengeService<C, U, R, S, P>
where
    C: ChallengeRepository,
    U: UsedCodeRepository,
    R: SmsSendRepository,
    S: SmsSender,
    P: TotpSecretProvider,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        challenges: Arc<C>,
        replay_guard: ReplayGuard<U>,
        rate_limiter: SmsRateLimiter<R>,
        sms_sender: Arc<S>,
        secret_provider: Arc<P>,
        totp: TotpVerifier,
        clock: Arc<dyn Clock>,
        tokens: Arc<dyn TokenSource>,
        config: ChallengeConfig,
    ) -> Self {
        Self {
            challenges,
            replay_guard,
            rate_limiter,
            sms_sender,
            secret_provider,
            totp,
            clock,
            tokens,
            config,
        }
    }

    /// Start a new challenge for a user.
    ///
    /// Any prior challenge for the user is cancelled: starting a new flow
    /// invalidates the old token. For SMS the resend cooldown and the
    /// sliding-window limiter are consulted before anything is created or
    /// dispatched.
    pub async fn create_challenge(
        &self,
        user_id: Uuid,
        method: MfaMethod,
    ) -> DomainResult<ChallengeCreated> {
        let now = self.clock.now();

        match method {
            MfaMethod::Totp => self.create_totp_challenge(user_id, now).await,
            MfaMethod::Sms => self.create_sms_challenge(user_id, now).await,
        }
    }

    async fn create_totp_challenge(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> DomainResult<ChallengeCreated> {
        self.challenges.delete_for_user(user_id).await?;

        let challenge = MfaChallenge::new_totp(self.tokens.opaque_token(), user_id, now);
        let created = ChallengeCreated {
            challenge_token: challenge.token.clone(),
            method: MfaMethod::Totp,
            expires_at: challenge.expires_at,
            next_resend_at: None,
        };
        self.challenges.insert(challenge).await?;

        tracing::info!(
            user_id = %user_id,
            method = MfaMethod::Totp.as_str(),
            event = "mfa_challenge_created",
            "MFA challenge created"
        );
        Ok(created)
    }

    async fn create_sms_challenge(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> DomainResult<ChallengeCreated> {
        self.check_sms_cooldown(user_id, now).await?;
        self.check_sms_window(user_id, now).await?;

        self.challenges.delete_for_user(user_id).await?;

        let code = generate_sms_code();
        match self.sms_sender.send_code(user_id, &code).await {
            Ok(message_id) => {
                tracing::info!(
                    user_id = %user_id,
                    message_id = %message_id,
                    event = "mfa_sms_dispatched",
                    "Verification SMS dispatched"
                );
            }
            Err(provider_error) => {
                tracing::error!(
                    user_id = %user_id,
                    error = %provider_error,
                    event = "mfa_sms_dispatch_failed",
                    "Verification SMS dispatch failed"
                );
                return Err(MfaError::SmsDeliveryFailure.into());
            }
        }
        self.rate_limiter.record_send(user_id, now).await?;

        let challenge =
            MfaChallenge::new_sms(self.tokens.opaque_token(), user_id, hash_code(&code), now);
        let created = ChallengeCreated {
            challenge_token: challenge.token.clone(),
            method: MfaMethod::Sms,
            expires_at: challenge.expires_at,
            next_resend_at: Some(now + self.config.resend_cooldown()),
        };
        self.challenges.insert(challenge).await?;

        tracing::info!(
            user_id = %user_id,
            method = MfaMethod::Sms.as_str(),
            event = "mfa_challenge_created",
            "MFA challenge created"
        );
        Ok(created)
    }

    /// Reject a dispatch still inside the per-challenge resend cooldown.
    async fn check_sms_cooldown(&self, user_id: Uuid, now: DateTime<Utc>) -> DomainResult<()> {
        for challenge in self.challenges.find_by_user(user_id).await? {
            if challenge.method != MfaMethod::Sms || challenge.is_terminal(now) {
                continue;
            }
            if let Some(last_sent_at) = challenge.last_sent_at {
                let retry_at = last_sent_at + self.config.resend_cooldown();
                if now < retry_at {
                    tracing::warn!(
                        user_id = %user_id,
                        retry_at = %retry_at,
                        event = "mfa_sms_cooldown",
                        "SMS resend requested inside cooldown"
                    );
                    return Err(MfaError::RateLimited { retry_at }.into());
                }
            }
        }
        Ok(())
    }

    /// Reject a dispatch when the sliding window is spent.
    async fn check_sms_window(&self, user_id: Uuid, now: DateTime<Utc>) -> DomainResult<()> {
        if self.rate_limiter.remaining_sends(user_id, now).await? > 0 {
            return Ok(());
        }
        // At the limit there is always an oldest qualifying send.
        let retry_at = self
            .rate_limiter
            .next_reset_time(user_id, now)
            .await?
            .unwrap_or(now);
        tracing::warn!(
            user_id = %user_id,
            retry_at = %retry_at,
            event = "mfa_sms_rate_limited",
            "SMS send rejected by sliding-window limit"
        );
        Err(MfaError::RateLimited { retry_at }.into())
    }

    /// Verify a submitted code against the challenge identified by `token`.
    ///
    /// Business failures come back as [`ChallengeVerification`] variants;
    /// `Err` is reserved for storage and collaborator faults.
    pub async fn verify(
        &self,
        token: &str,
        code: &str,
        remember_device: bool,
    ) -> DomainResult<ChallengeVerification> {
        let now = self.clock.now();

        let challenge = match self.challenges.find_by_token(token).await? {
            Some(challenge) => challenge,
            None => {
                tracing::warn!(event = "mfa_verify_unknown_token", "Unknown challenge token");
                return Ok(ChallengeVerification::InvalidToken);
            }
        };

        if challenge.is_terminal(now) {
            self.challenges.delete_by_token(token).await?;
            tracing::info!(
                user_id = %challenge.user_id,
                event = "mfa_verify_expired",
                "Verification against a terminal challenge"
            );
            return Ok(ChallengeVerification::Expired);
        }

        match challenge.method {
            MfaMethod::Totp => self.verify_totp(challenge, code, remember_device, now).await,
            MfaMethod::Sms => self.verify_sms(challenge, code, remember_device, now).await,
        }
    }

    async fn verify_totp(
        &self,
        challenge: MfaChallenge,
        code: &str,
        remember_device: bool,
        now: DateTime<Utc>,
    ) -> DomainResult<ChallengeVerification> {
        let secret = self
            .secret_provider
            .totp_secret(challenge.user_id)
            .await?
            .ok_or(MfaError::MissingTotpSecret)?;

        let step = match self.totp.matched_step(&secret, code, now)? {
            Some(step) => step,
            None => return self.register_failure(challenge, FailureKind::WrongCode).await,
        };

        let code_hash = hash_code(code);
        if self
            .replay_guard
            .was_used(challenge.user_id, &code_hash, step)
            .await?
        {
            return self.register_failure(challenge, FailureKind::Replay).await;
        }

        let expires_at = self.totp.step_window_end(step);
        match self
            .replay_guard
            .mark_used(challenge.user_id, code_hash, step, expires_at)
            .await?
        {
            MarkUsed::Recorded => self.succeed(challenge, remember_device).await,
            // Lost the insert race to a concurrent verification.
            MarkUsed::AlreadyUsed => self.register_failure(challenge, FailureKind::Replay).await,
        }
    }

    async fn verify_sms(
        &self,
        challenge: MfaChallenge,
        code: &str,
        remember_device: bool,
        _now: DateTime<Utc>,
    ) -> DomainResult<ChallengeVerification> {
        let stored_hash = challenge.sms_code_hash.clone().ok_or_else(|| {
            crate::errors::DomainError::Internal {
                message: "SMS challenge is missing its code hash".to_string(),
            }
        })?;

        if constant_time_eq(hash_code(code).as_bytes(), stored_hash.as_bytes()) {
            self.succeed(challenge, remember_device).await
        } else {
            self.register_failure(challenge, FailureKind::WrongCode).await
        }
    }

    async fn succeed(
        &self,
        challenge: MfaChallenge,
        remember_device: bool,
    ) -> DomainResult<ChallengeVerification> {
        self.challenges.delete_by_token(&challenge.token).await?;
        tracing::info!(
            user_id = %challenge.user_id,
            method = challenge.method.as_str(),
            event = "mfa_verify_success",
            "MFA verification succeeded"
        );
        Ok(ChallengeVerification::Success {
            user_id: challenge.user_id,
            method: challenge.method,
            remember_device,
        })
    }

    /// Burn one attempt. Exhaustion persists the terminal snapshot and
    /// reports `Expired`; the tombstone is removed on the next touch or by
    /// the sweep, so a post-exhaustion retry also sees `Expired` rather
    /// than `InvalidToken`.
    async fn register_failure(
        &self,
        challenge: MfaChallenge,
        kind: FailureKind,
    ) -> DomainResult<ChallengeVerification> {
        match challenge.register_failure() {
            FailureTransition::Retry(next) => {
                let remaining = next.remaining_attempts();
                self.challenges.update(next).await?;
                tracing::warn!(
                    user_id = %challenge.user_id,
                    remaining_attempts = remaining,
                    replayed = matches!(kind, FailureKind::Replay),
                    event = "mfa_verify_failed",
                    "MFA verification attempt failed"
                );
                Ok(match kind {
                    FailureKind::WrongCode => ChallengeVerification::InvalidCode {
                        remaining_attempts: remaining,
                    },
                    FailureKind::Replay => ChallengeVerification::CodeAlreadyUsed {
                        remaining_attempts: remaining,
                    },
                })
            }
            FailureTransition::Exhausted(tombstone) => {
                self.challenges.update(tombstone).await?;
                tracing::warn!(
                    user_id = %challenge.user_id,
                    event = "mfa_challenge_exhausted",
                    "MFA challenge attempt budget spent"
                );
                Ok(ChallengeVerification::Expired)
            }
        }
    }

    /// Storage-hygiene sweep over challenges, used-code records, and the
    /// SMS send ledger.
    pub async fn purge_expired(&self) -> DomainResult<()> {
        let now = self.clock.now();

        let challenges = self.challenges.delete_terminal(now).await?;
        let used_codes = self.replay_guard.purge_expired(now).await?;
        let sms_sends = self.rate_limiter.purge_stale(now).await?;

        if challenges > 0 || used_codes > 0 || sms_sends > 0 {
            tracing::debug!(
                challenges,
                used_codes,
                sms_sends,
                event = "mfa_purge",
                "Purged expired MFA records"
            );
        }
        Ok(())
    }
}

/// Why a verification attempt failed, for outcome selection.
#[derive(Debug, Clone, Copy)]
enum FailureKind {
    WrongCode,
    Replay,
}
