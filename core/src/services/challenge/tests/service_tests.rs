//! Challenge service behavior tests.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::clock::{Clock, FixedClock};
use crate::domain::entities::MfaMethod;
use crate::domain::value_objects::ChallengeVerification;
use crate::errors::{DomainError, MfaError};
use crate::ids::RandomTokenSource;
use crate::repositories::{
    ChallengeRepository, MockChallengeRepository, MockSmsSendRepository, MockUsedCodeRepository,
};
use crate::services::challenge::{ChallengeConfig, ChallengeService};
use crate::services::rate_limit::{SmsRateLimitConfig, SmsRateLimiter};
use crate::services::replay::ReplayGuard;
use crate::services::totp::{TotpConfig, TotpVerifier};

use crate::services::challenge::tests_support::{MockSecretProvider, MockSmsSender};

const SECRET: &str = "JBSWY3DPEHPK3PXP";

struct Fixture {
    service: ChallengeService<
        MockChallengeRepository,
        MockUsedCodeRepository,
        MockSmsSendRepository,
        MockSmsSender,
        MockSecretProvider,
    >,
    challenges: Arc<MockChallengeRepository>,
    sms_sender: Arc<MockSmsSender>,
    secrets: Arc<MockSecretProvider>,
    clock: Arc<FixedClock>,
    totp: TotpVerifier,
}

fn fixture() -> Fixture {
    let challenges = Arc::new(MockChallengeRepository::new());
    let used_codes = Arc::new(MockUsedCodeRepository::new());
    let sms_sends = Arc::new(MockSmsSendRepository::new());
    let sms_sender = Arc::new(MockSmsSender::new());
    let secrets = Arc::new(MockSecretProvider::new());
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap(),
    ));
    let totp = TotpVerifier::new(TotpConfig::default());

    let service = ChallengeService::new(
        Arc::clone(&challenges),
        ReplayGuard::new(used_codes),
        SmsRateLimiter::new(Arc::clone(&sms_sends), SmsRateLimitConfig::default()),
        Arc::clone(&sms_sender),
        Arc::clone(&secrets),
        totp.clone(),
        clock.clone(),
        Arc::new(RandomTokenSource),
        ChallengeConfig::default(),
    );

    Fixture {
        service,
        challenges,
        sms_sender,
        secrets,
        clock,
        totp,
    }
}

impl Fixture {
    /// A TOTP code valid at the fixture clock's current instant.
    fn current_code(&self) -> String {
        let step = self.totp.time_step(self.clock.now());
        self.totp.generate_code(SECRET, step).unwrap()
    }
}

#[tokio::test]
async fn totp_challenge_verifies_with_current_code() {
    let fx = fixture();
    let user = Uuid::new_v4();
    fx.secrets.enroll(user, SECRET).await;

    let created = fx.service.create_challenge(user, MfaMethod::Totp).await.unwrap();
    assert_eq!(created.method, MfaMethod::Totp);
    assert_eq!(created.next_resend_at, None);

    let outcome = fx
        .service
        .verify(&created.challenge_token, &fx.current_code(), true)
        .await
        .unwrap();
    assert_eq!(
        outcome,
        ChallengeVerification::Success {
            user_id: user,
            method: MfaMethod::Totp,
            remember_device: true,
        }
    );

    // Consumed on success
    let again = fx
        .service
        .verify(&created.challenge_token, &fx.current_code(), false)
        .await
        .unwrap();
    assert_eq!(again, ChallengeVerification::InvalidToken);
}

#[tokio::test]
async fn unknown_token_is_invalid_token() {
    let fx = fixture();
    let outcome = fx.service.verify("no-such-token", "123456", false).await.unwrap();
    assert_eq!(outcome, ChallengeVerification::InvalidToken);
}

#[tokio::test]
async fn creating_a_challenge_cancels_the_previous_one() {
    let fx = fixture();
    let user = Uuid::new_v4();
    fx.secrets.enroll(user, SECRET).await;

    let first = fx.service.create_challenge(user, MfaMethod::Totp).await.unwrap();
    let second = fx.service.create_challenge(user, MfaMethod::Totp).await.unwrap();

    let outcome = fx
        .service
        .verify(&first.challenge_token, &fx.current_code(), false)
        .await
        .unwrap();
    assert_eq!(outcome, ChallengeVerification::InvalidToken);

    let outcome = fx
        .service
        .verify(&second.challenge_token, &fx.current_code(), false)
        .await
        .unwrap();
    assert!(matches!(outcome, ChallengeVerification::Success { .. }));
}

#[tokio::test]
async fn expired_challenge_reports_expired_then_invalid_token() {
    let fx = fixture();
    let user = Uuid::new_v4();
    fx.secrets.enroll(user, SECRET).await;

    let created = fx.service.create_challenge(user, MfaMethod::Totp).await.unwrap();
    fx.clock.advance(Duration::minutes(5));

    let outcome = fx
        .service
        .verify(&created.challenge_token, &fx.current_code(), false)
        .await
        .unwrap();
    assert_eq!(outcome, ChallengeVerification::Expired);

    // The terminal row was deleted on touch
    let outcome = fx
        .service
        .verify(&created.challenge_token, &fx.current_code(), false)
        .await
        .unwrap();
    assert_eq!(outcome, ChallengeVerification::InvalidToken);
}

#[tokio::test]
async fn wrong_codes_exhaust_the_attempt_budget() {
    let fx = fixture();
    let user = Uuid::new_v4();
    fx.secrets.enroll(user, SECRET).await;

    let created = fx.service.create_challenge(user, MfaMethod::Totp).await.unwrap();
    let token = &created.challenge_token;

    assert_eq!(
        fx.service.verify(token, "000001", false).await.unwrap(),
        ChallengeVerification::InvalidCode { remaining_attempts: 2 }
    );
    assert_eq!(
        fx.service.verify(token, "000002", false).await.unwrap(),
        ChallengeVerification::InvalidCode { remaining_attempts: 1 }
    );
    // Third failure exhausts: reported as Expired
    assert_eq!(
        fx.service.verify(token, "000003", false).await.unwrap(),
        ChallengeVerification::Expired
    );

    // Retry after exhaustion is still Expired, not InvalidToken: the
    // tombstone row is only deleted by this touch.
    assert_eq!(
        fx.service.verify(token, &fx.current_code(), false).await.unwrap(),
        ChallengeVerification::Expired
    );
    assert_eq!(
        fx.service.verify(token, &fx.current_code(), false).await.unwrap(),
        ChallengeVerification::InvalidToken
    );
}

#[tokio::test]
async fn replayed_totp_code_is_rejected_and_burns_an_attempt() {
    let fx = fixture();
    let user = Uuid::new_v4();
    fx.secrets.enroll(user, SECRET).await;

    let first = fx.service.create_challenge(user, MfaMethod::Totp).await.unwrap();
    let code = fx.current_code();
    assert!(matches!(
        fx.service.verify(&first.challenge_token, &code, false).await.unwrap(),
        ChallengeVerification::Success { .. }
    ));

    // Same code against a fresh challenge in the same step
    let second = fx.service.create_challenge(user, MfaMethod::Totp).await.unwrap();
    assert_eq!(
        fx.service.verify(&second.challenge_token, &code, false).await.unwrap(),
        ChallengeVerification::CodeAlreadyUsed { remaining_attempts: 2 }
    );
}

#[tokio::test]
async fn missing_totp_secret_is_an_infrastructure_fault() {
    let fx = fixture();
    let user = Uuid::new_v4();

    let created = fx.service.create_challenge(user, MfaMethod::Totp).await.unwrap();
    let error = fx
        .service
        .verify(&created.challenge_token, "123456", false)
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        DomainError::Mfa(MfaError::MissingTotpSecret)
    ));
}

#[tokio::test]
async fn sms_challenge_verifies_with_dispatched_code() {
    let fx = fixture();
    let user = Uuid::new_v4();

    let created = fx.service.create_challenge(user, MfaMethod::Sms).await.unwrap();
    assert_eq!(created.method, MfaMethod::Sms);
    assert!(created.next_resend_at.is_some());

    let code = fx.sms_sender.last_code_for(user).await.unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit()));

    let outcome = fx
        .service
        .verify(&created.challenge_token, &code, false)
        .await
        .unwrap();
    assert!(matches!(outcome, ChallengeVerification::Success { .. }));
}

#[tokio::test]
async fn wrong_sms_code_burns_an_attempt() {
    let fx = fixture();
    let user = Uuid::new_v4();

    let created = fx.service.create_challenge(user, MfaMethod::Sms).await.unwrap();
    let code = fx.sms_sender.last_code_for(user).await.unwrap();
    let wrong = if code == "000000" { "000001" } else { "000000" };

    assert_eq!(
        fx.service.verify(&created.challenge_token, wrong, false).await.unwrap(),
        ChallengeVerification::InvalidCode { remaining_attempts: 2 }
    );
    assert!(matches!(
        fx.service.verify(&created.challenge_token, &code, false).await.unwrap(),
        ChallengeVerification::Success { .. }
    ));
}

#[tokio::test]
async fn sms_resend_inside_cooldown_is_rate_limited() {
    let fx = fixture();
    let user = Uuid::new_v4();

    fx.service.create_challenge(user, MfaMethod::Sms).await.unwrap();
    let start = fx.clock.now();
    fx.clock.advance(Duration::seconds(30));

    let error = fx.service.create_challenge(user, MfaMethod::Sms).await.unwrap_err();
    match error {
        DomainError::Mfa(MfaError::RateLimited { retry_at }) => {
            assert_eq!(retry_at, start + Duration::seconds(60));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(fx.sms_sender.sent_count().await, 1);
}

#[tokio::test]
async fn sms_sends_beyond_the_window_limit_are_rejected() {
    let fx = fixture();
    let user = Uuid::new_v4();

    // Three sends spaced past the cooldown
    for _ in 0..3 {
        fx.service.create_challenge(user, MfaMethod::Sms).await.unwrap();
        fx.clock.advance(Duration::minutes(2));
    }

    let error = fx.service.create_challenge(user, MfaMethod::Sms).await.unwrap_err();
    assert!(matches!(
        error,
        DomainError::Mfa(MfaError::RateLimited { .. })
    ));
    assert_eq!(fx.sms_sender.sent_count().await, 3);

    // The first send slides out of the window
    fx.clock.advance(Duration::minutes(60));
    fx.service.create_challenge(user, MfaMethod::Sms).await.unwrap();
    assert_eq!(fx.sms_sender.sent_count().await, 4);
}

#[tokio::test]
async fn sms_delivery_failure_creates_no_challenge() {
    let fx = fixture();
    let user = Uuid::new_v4();

    fx.sms_sender.fail_next_sends(true);
    let error = fx.service.create_challenge(user, MfaMethod::Sms).await.unwrap_err();
    assert!(matches!(
        error,
        DomainError::Mfa(MfaError::SmsDeliveryFailure)
    ));

    assert!(fx.challenges.find_by_user(user).await.unwrap().is_empty());
}

#[tokio::test]
async fn purge_removes_terminal_challenges() {
    let fx = fixture();
    let user = Uuid::new_v4();
    fx.secrets.enroll(user, SECRET).await;

    fx.service.create_challenge(user, MfaMethod::Totp).await.unwrap();
    fx.clock.advance(Duration::minutes(6));

    fx.service.purge_expired().await.unwrap();
    assert!(fx.challenges.find_by_user(user).await.unwrap().is_empty());
}
