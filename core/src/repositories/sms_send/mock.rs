//! In-memory implementation of SmsSendRepository for testing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::SmsSendRecord;
use crate::errors::DomainError;

use super::r#trait::SmsSendRepository;

/// Mock SMS send ledger
pub struct MockSmsSendRepository {
    records: Arc<RwLock<Vec<SmsSendRecord>>>,
}

impl MockSmsSendRepository {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

impl Default for MockSmsSendRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SmsSendRepository for MockSmsSendRepository {
    async fn record(&self, record: SmsSendRecord) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        records.push(record);
        Ok(())
    }

    async fn find_since(
        &self,
        user_id: Uuid,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<SmsSendRecord>, DomainError> {
        let records = self.records.read().await;
        let mut matching: Vec<SmsSendRecord> = records
            .iter()
            .filter(|r| r.user_id == user_id && r.sent_at >= cutoff)
            .cloned()
            .collect();
        matching.sort_by_key(|r| r.sent_at);
        Ok(matching)
    }

    async fn delete_before(&self, cutoff: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.sent_at >= cutoff);
        Ok(before - records.len())
    }
}
