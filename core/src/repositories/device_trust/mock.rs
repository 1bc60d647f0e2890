//! In-memory implementation of DeviceTrustRepository for testing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::DeviceTrust;
use crate::errors::DomainError;

use super::r#trait::DeviceTrustRepository;

/// Mock device trust repository keyed by record id
pub struct MockDeviceTrustRepository {
    trusts: Arc<RwLock<HashMap<Uuid, DeviceTrust>>>,
}

impl MockDeviceTrustRepository {
    pub fn new() -> Self {
        Self {
            trusts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn len(&self) -> usize {
        self.trusts.read().await.len()
    }
}

impl Default for MockDeviceTrustRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeviceTrustRepository for MockDeviceTrustRepository {
    async fn insert(&self, trust: DeviceTrust) -> Result<(), DomainError> {
        let mut trusts = self.trusts.write().await;

        if trusts.contains_key(&trust.id) {
            return Err(DomainError::Conflict {
                resource: "device_trust".to_string(),
            });
        }

        trusts.insert(trust.id, trust);
        Ok(())
    }

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<DeviceTrust>, DomainError> {
        let trusts = self.trusts.read().await;
        Ok(trusts.values().find(|t| t.token_hash == token_hash).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DeviceTrust>, DomainError> {
        let trusts = self.trusts.read().await;
        Ok(trusts.get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<DeviceTrust>, DomainError> {
        let trusts = self.trusts.read().await;
        Ok(trusts
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, trust: DeviceTrust) -> Result<(), DomainError> {
        let mut trusts = self.trusts.write().await;

        if !trusts.contains_key(&trust.id) {
            return Err(DomainError::NotFound {
                resource: "device_trust".to_string(),
            });
        }

        trusts.insert(trust.id, trust);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut trusts = self.trusts.write().await;
        Ok(trusts.remove(&id).is_some())
    }

    async fn delete_for_user(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let mut trusts = self.trusts.write().await;
        let before = trusts.len();
        trusts.retain(|_, t| t.user_id != user_id);
        Ok(before - trusts.len())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut trusts = self.trusts.write().await;
        let before = trusts.len();
        trusts.retain(|_, t| !t.is_expired(now));
        Ok(before - trusts.len())
    }
}
