//! Authentication orchestrator.

use std::sync::Arc;

use uuid::Uuid;

use crate::clock::Clock;
use crate::domain::events::{AuthEvent, VerificationFailureKind};
use crate::domain::value_objects::{
    BeginMfaOutcome, ChallengeVerification, DeviceContext, DeviceView, VerifiedIdentity,
    VerifyMfaOutcome,
};
use crate::errors::{DomainResult, MfaError};
use crate::repositories::{
    ChallengeRepository, DeviceTrustRepository, SmsSendRepository, UsedCodeRepository,
};
use crate::services::challenge::{ChallengeService, SmsSender, TotpSecretProvider};
use crate::services::events::{EventPublisher, NoOpEventPublisher};
use crate::services::trust::DeviceTrustService;

use super::traits::SessionIssuer;

/// Signin orchestrator
///
/// Sequences device-trust bypass, challenge creation/verification, session
/// issuance, and event publication. It owns no verification logic itself;
/// every step is delegated to a collaborator.
pub struct SigninService<C, U, R, S, P, D, I, E = NoOpEventPublisher>
where
    C: ChallengeRepository,
    U: UsedCodeRepository,
    R: SmsSendRepository,
    S: SmsSender,
    P: TotpSecretProvider,
    D: DeviceTrustRepository,
    I: SessionIssuer,
    E: EventPublisher,
{
    challenges: Arc<ChallengeService<C, U, R, S, P>>,
    trusts: Arc<DeviceTrustService<D>>,
    sessions: Arc<I>,
    events: Arc<E>,
    clock: Arc<dyn Clock>,
}

impl<C, U, R, S, P, D, I> SigninService<C, U, R, S, P, D, I, NoOpEventPublisher>
where
    C: ChallengeRepository,
    U: UsedCodeRepository,
    R: SmsSendRepository,
    S: SmsSender,
    P: TotpSecretProvider,
    D: DeviceTrustRepository,
    I: SessionIssuer,
{
    /// Orchestrator without an event sink.
    pub fn new(
        challenges: Arc<ChallengeService<C, U, R, S, P>>,
        trusts: Arc<DeviceTrustService<D>>,
        sessions: Arc<I>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_event_publisher(
            challenges,
            trusts,
            sessions,
            Arc::new(NoOpEventPublisher),
            clock,
        )
    }
}

impl<C, U, R, S, P, D, I, E> SigninService<C, U, R, S, P, D, I, E>
where
    C: ChallengeRepository,
    U: UsedCodeRepository,
    R: SmsSendRepository,
    S: SmsSender,
    P: TotpSecretProvider,
    D: DeviceTrustRepository,
    I: SessionIssuer,
    E: EventPublisher + 'static,
{
    pub fn with_event_publisher(
        challenges: Arc<ChallengeService<C, U, R, S, P>>,
        trusts: Arc<DeviceTrustService<D>>,
        sessions: Arc<I>,
        events: Arc<E>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            challenges,
            trusts,
            sessions,
            events,
            clock,
        }
    }

    /// Continue a signin whose credential check already succeeded.
    ///
    /// A valid device trust bypasses MFA outright; a user without a second
    /// factor gets a session directly; everyone else gets a challenge and
    /// no session until verification succeeds.
    pub async fn begin_mfa(
        &self,
        identity: VerifiedIdentity,
        device: DeviceContext,
    ) -> DomainResult<BeginMfaOutcome> {
        if let Some(trust_token) = device.trust_token.as_deref() {
            if let Some(trust) = self
                .trusts
                .verify_trust(trust_token, &device.fingerprint, &device.user_agent)
                .await
            {
                if trust.user_id == identity.user_id {
                    let session = self.issue_session(identity.user_id).await?;
                    return Ok(BeginMfaOutcome::DeviceTrustBypassed { session });
                }
                // A trust minted for another account never bypasses MFA.
                tracing::warn!(
                    user_id = %identity.user_id,
                    trust_user_id = %trust.user_id,
                    event = "device_trust_owner_mismatch",
                    "Presented trust belongs to a different user"
                );
            }
        }

        if !identity.mfa_enabled {
            let session = self.issue_session(identity.user_id).await?;
            return Ok(BeginMfaOutcome::MfaNotRequired { session });
        }

        let created = self
            .challenges
            .create_challenge(identity.user_id, identity.mfa_method)
            .await?;
        self.publish(AuthEvent::ChallengeInitiated {
            user_id: identity.user_id,
            method: created.method,
            at: self.clock.now(),
        });
        Ok(BeginMfaOutcome::ChallengeRequired {
            challenge_token: created.challenge_token,
            method: created.method,
            expires_at: created.expires_at,
        })
    }

    /// Verify a submitted code and, on success, issue a session and
    /// optionally remember the device.
    pub async fn verify_mfa(
        &self,
        challenge_token: &str,
        code: &str,
        remember_device: bool,
        device: DeviceContext,
    ) -> DomainResult<VerifyMfaOutcome> {
        let verification = self
            .challenges
            .verify(challenge_token, code, remember_device)
            .await?;

        let outcome = match verification {
            ChallengeVerification::Success {
                user_id,
                method,
                remember_device,
            } => {
                let session = self.issue_session(user_id).await?;

                let device_trust_token = if remember_device {
                    let created = self
                        .trusts
                        .create_trust(
                            user_id,
                            &device.fingerprint,
                            &device.user_agent,
                            device.ip_address.clone(),
                        )
                        .await?;
                    self.publish(AuthEvent::DeviceRemembered {
                        user_id,
                        trust_id: created.trust.id,
                        at: self.clock.now(),
                    });
                    Some(created.token)
                } else {
                    None
                };

                self.publish(AuthEvent::VerificationSucceeded {
                    user_id,
                    method,
                    at: self.clock.now(),
                });
                VerifyMfaOutcome::Success {
                    user_id,
                    session,
                    device_trust_token,
                }
            }
            ChallengeVerification::InvalidToken => {
                self.publish_failure(VerificationFailureKind::InvalidToken, None);
                VerifyMfaOutcome::InvalidToken
            }
            ChallengeVerification::Expired => {
                self.publish_failure(VerificationFailureKind::Expired, None);
                VerifyMfaOutcome::Expired
            }
            ChallengeVerification::InvalidCode { remaining_attempts } => {
                self.publish_failure(
                    VerificationFailureKind::InvalidCode,
                    Some(remaining_attempts),
                );
                VerifyMfaOutcome::InvalidCode { remaining_attempts }
            }
            ChallengeVerification::CodeAlreadyUsed { remaining_attempts } => {
                self.publish_failure(
                    VerificationFailureKind::CodeAlreadyUsed,
                    Some(remaining_attempts),
                );
                VerifyMfaOutcome::CodeAlreadyUsed { remaining_attempts }
            }
        };
        Ok(outcome)
    }

    /// Remembered devices for a user; `current_token` marks the entry the
    /// caller is presenting.
    pub async fn list_devices(
        &self,
        user_id: Uuid,
        current_token: Option<&str>,
    ) -> DomainResult<Vec<DeviceView>> {
        self.trusts.list_devices(user_id, current_token).await
    }

    /// Revoke one remembered device.
    pub async fn revoke_device(&self, user_id: Uuid, trust_id: Uuid) -> DomainResult<()> {
        self.trusts.revoke_device(user_id, trust_id).await?;
        self.publish(AuthEvent::DeviceRevoked {
            user_id,
            trust_id: Some(trust_id),
            reason: "user_revoked".to_string(),
            at: self.clock.now(),
        });
        Ok(())
    }

    /// Revoke every remembered device for a user, e.g. after a credential
    /// change.
    pub async fn revoke_all_devices(&self, user_id: Uuid, reason: &str) -> DomainResult<usize> {
        let removed = self.trusts.revoke_all_devices(user_id, reason).await?;
        self.publish(AuthEvent::DeviceRevoked {
            user_id,
            trust_id: None,
            reason: reason.to_string(),
            at: self.clock.now(),
        });
        Ok(removed)
    }

    async fn issue_session(&self, user_id: Uuid) -> DomainResult<String> {
        self.sessions.issue_session(user_id).await.map_err(|message| {
            tracing::error!(
                user_id = %user_id,
                error = %message,
                event = "session_issuance_failed",
                "Session issuance failed"
            );
            MfaError::SessionIssuanceFailed { message }.into()
        })
    }

    /// Publish a fact from a spawned task; failures are logged and never
    /// surface to the caller.
    fn publish(&self, event: AuthEvent) {
        let publisher = Arc::clone(&self.events);
        tokio::task::spawn(async move {
            let kind = event.kind();
            if let Err(error) = publisher.publish(event).await {
                tracing::warn!(
                    kind,
                    error = %error,
                    event = "auth_event_publish_failed",
                    "Failed to publish auth event"
                );
            }
        });
    }

    fn publish_failure(&self, kind: VerificationFailureKind, remaining_attempts: Option<u32>) {
        self.publish(AuthEvent::VerificationFailed {
            user_id: None,
            kind,
            remaining_attempts,
            at: self.clock.now(),
        });
    }
}
