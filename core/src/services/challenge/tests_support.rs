//! Collaborator mocks shared by challenge and signin tests.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::DomainResult;
use crate::services::challenge::{SmsSender, TotpSecretProvider};

/// Recording SMS sender with a switchable failure mode.
pub struct MockSmsSender {
    sent: RwLock<Vec<(Uuid, String)>>,
    fail: AtomicBool,
}

impl MockSmsSender {
    pub fn new() -> Self {
        Self {
            sent: RwLock::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn fail_next_sends(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// The code most recently dispatched to a user.
    pub async fn last_code_for(&self, user_id: Uuid) -> Option<String> {
        self.sent
            .read()
            .await
            .iter()
            .rev()
            .find(|(user, _)| *user == user_id)
            .map(|(_, code)| code.clone())
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.read().await.len()
    }
}

#[async_trait]
impl SmsSender for MockSmsSender {
    async fn send_code(&self, user_id: Uuid, code: &str) -> Result<String, String> {
        if self.fail.load(Ordering::SeqCst) {
            return Err("provider unavailable".to_string());
        }
        let mut sent = self.sent.write().await;
        sent.push((user_id, code.to_string()));
        Ok(format!("msg-{}", sent.len()))
    }
}

/// Secret provider backed by an in-memory map.
pub struct MockSecretProvider {
    secrets: RwLock<Vec<(Uuid, String)>>,
}

impl MockSecretProvider {
    pub fn new() -> Self {
        Self {
            secrets: RwLock::new(Vec::new()),
        }
    }

    pub async fn enroll(&self, user_id: Uuid, secret: &str) {
        self.secrets.write().await.push((user_id, secret.to_string()));
    }
}

#[async_trait]
impl TotpSecretProvider for MockSecretProvider {
    async fn totp_secret(&self, user_id: Uuid) -> DomainResult<Option<String>> {
        Ok(self
            .secrets
            .read()
            .await
            .iter()
            .find(|(user, _)| *user == user_id)
            .map(|(_, secret)| secret.clone()))
    }
}
