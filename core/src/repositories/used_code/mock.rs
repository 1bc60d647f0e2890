//! In-memory implementation of UsedCodeRepository for testing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::UsedOneTimeCode;
use crate::errors::DomainError;

use super::r#trait::UsedCodeRepository;

/// Mock replay ledger keyed by the (user, code hash, time step) tuple
pub struct MockUsedCodeRepository {
    records: Arc<RwLock<HashMap<(Uuid, String, i64), UsedOneTimeCode>>>,
}

impl MockUsedCodeRepository {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

impl Default for MockUsedCodeRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UsedCodeRepository for MockUsedCodeRepository {
    async fn insert(&self, record: UsedOneTimeCode) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        let key = record.key();

        if records.contains_key(&key) {
            return Err(DomainError::Conflict {
                resource: "used_one_time_code".to_string(),
            });
        }

        records.insert(key, record);
        Ok(())
    }

    async fn contains(
        &self,
        user_id: Uuid,
        code_hash: &str,
        time_step: i64,
    ) -> Result<bool, DomainError> {
        let records = self.records.read().await;
        Ok(records.contains_key(&(user_id, code_hash.to_string(), time_step)))
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| !r.is_expired(now));
        Ok(before - records.len())
    }
}
