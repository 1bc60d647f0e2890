//! In-memory implementation of ChallengeRepository for testing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::MfaChallenge;
use crate::errors::DomainError;

use super::r#trait::ChallengeRepository;

/// Mock challenge repository keyed by challenge token
pub struct MockChallengeRepository {
    challenges: Arc<RwLock<HashMap<String, MfaChallenge>>>,
}

impl MockChallengeRepository {
    pub fn new() -> Self {
        Self {
            challenges: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored challenges, terminal rows included.
    pub async fn len(&self) -> usize {
        self.challenges.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.challenges.read().await.is_empty()
    }
}

impl Default for MockChallengeRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChallengeRepository for MockChallengeRepository {
    async fn insert(&self, challenge: MfaChallenge) -> Result<(), DomainError> {
        let mut challenges = self.challenges.write().await;

        if challenges.contains_key(&challenge.token) {
            return Err(DomainError::Conflict {
                resource: "challenge".to_string(),
            });
        }

        challenges.insert(challenge.token.clone(), challenge);
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<MfaChallenge>, DomainError> {
        let challenges = self.challenges.read().await;
        Ok(challenges.get(token).cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<MfaChallenge>, DomainError> {
        let challenges = self.challenges.read().await;
        Ok(challenges
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, challenge: MfaChallenge) -> Result<(), DomainError> {
        let mut challenges = self.challenges.write().await;

        if !challenges.contains_key(&challenge.token) {
            return Err(DomainError::NotFound {
                resource: "challenge".to_string(),
            });
        }

        challenges.insert(challenge.token.clone(), challenge);
        Ok(())
    }

    async fn delete_by_token(&self, token: &str) -> Result<bool, DomainError> {
        let mut challenges = self.challenges.write().await;
        Ok(challenges.remove(token).is_some())
    }

    async fn delete_for_user(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let mut challenges = self.challenges.write().await;
        let before = challenges.len();
        challenges.retain(|_, c| c.user_id != user_id);
        Ok(before - challenges.len())
    }

    async fn delete_terminal(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut challenges = self.challenges.write().await;
        let before = challenges.len();
        challenges.retain(|_, c| !c.is_terminal(now));
        Ok(before - challenges.len())
    }
}
