//! Device trust creation, verification, and management.

use std::sync::Arc;

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::clock::Clock;
use crate::domain::entities::DeviceTrust;
use crate::domain::value_objects::DeviceView;
use crate::errors::{DomainError, DomainResult};
use crate::ids::TokenSource;
use crate::repositories::DeviceTrustRepository;

use super::config::DeviceTrustConfig;

/// SHA-256 hex digest of an opaque trust token.
pub(crate) fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

fn generate_salt() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Result of minting a device trust: the plaintext token goes to the
/// client once and is never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTrust {
    pub token: String,
    pub trust: DeviceTrust,
}

/// Device trust store
///
/// Verification is deliberately fail-silent: every failure, storage faults
/// included, collapses to "require MFA". Management operations (list,
/// revoke) surface errors normally.
pub struct DeviceTrustService<D: DeviceTrustRepository> {
    trusts: Arc<D>,
    clock: Arc<dyn Clock>,
    tokens: Arc<dyn TokenSource>,
    config: DeviceTrustConfig,
}

impl<D: DeviceTrustRepository> DeviceTrustService<D> {
    pub fn new(
        trusts: Arc<D>,
        clock: Arc<dyn Clock>,
        tokens: Arc<dyn TokenSource>,
        config: DeviceTrustConfig,
    ) -> Self {
        Self {
            trusts,
            clock,
            tokens,
            config,
        }
    }

    /// Mint a trust for a device, evicting the user's oldest trust when
    /// the per-user cap is reached.
    ///
    /// The count-evict-insert sequence is not atomic; concurrent creations
    /// may transiently overshoot the cap. Later creations and sweeps
    /// restore the bound.
    pub async fn create_trust(
        &self,
        user_id: Uuid,
        fingerprint: &str,
        user_agent: &str,
        ip_address: Option<String>,
    ) -> DomainResult<CreatedTrust> {
        let now = self.clock.now();

        let live = self.trusts.count_live_for_user(user_id, now).await?;
        if live >= self.config.max_per_user {
            if let Some(oldest) = self.trusts.find_oldest_for_user(user_id, now).await? {
                self.trusts.delete(oldest.id).await?;
                tracing::info!(
                    user_id = %user_id,
                    evicted_id = %oldest.id,
                    event = "device_trust_evicted",
                    "Evicted oldest device trust at capacity"
                );
            }
        }

        let token = self.tokens.opaque_token();
        let trust = DeviceTrust::new(
            self.tokens.new_id(),
            user_id,
            hash_token(&token),
            generate_salt(),
            fingerprint,
            user_agent.to_string(),
            ip_address,
            now,
        );
        self.trusts.insert(trust.clone()).await?;

        tracing::info!(
            user_id = %user_id,
            trust_id = %trust.id,
            expires_at = %trust.expires_at,
            event = "device_trust_created",
            "Device trust created"
        );
        Ok(CreatedTrust { token, trust })
    }

    /// Resolve a presented trust token to a live, matching trust.
    ///
    /// `None` always means "require MFA": unknown token, expiry, device
    /// mismatch, and storage faults are indistinguishable to the caller.
    /// An expired row found here is deleted lazily; a match bumps
    /// `last_used_at`.
    pub async fn verify_trust(
        &self,
        token: &str,
        fingerprint: &str,
        user_agent: &str,
    ) -> Option<DeviceTrust> {
        match self.try_verify_trust(token, fingerprint, user_agent).await {
            Ok(result) => result,
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    event = "device_trust_verify_fault",
                    "Trust verification hit a storage fault; requiring MFA"
                );
                None
            }
        }
    }

    async fn try_verify_trust(
        &self,
        token: &str,
        fingerprint: &str,
        user_agent: &str,
    ) -> DomainResult<Option<DeviceTrust>> {
        let now = self.clock.now();

        let trust = match self.trusts.find_by_token_hash(&hash_token(token)).await? {
            Some(trust) => trust,
            None => {
                tracing::debug!(event = "device_trust_unknown", "Unknown trust token");
                return Ok(None);
            }
        };

        if trust.is_expired(now) {
            self.trusts.delete(trust.id).await?;
            tracing::debug!(
                trust_id = %trust.id,
                event = "device_trust_expired",
                "Expired trust presented; deleted"
            );
            return Ok(None);
        }

        if !trust.matches_device(fingerprint, user_agent) {
            tracing::warn!(
                user_id = %trust.user_id,
                trust_id = %trust.id,
                event = "device_trust_mismatch",
                "Trust token presented from a non-matching device"
            );
            return Ok(None);
        }

        let touched = trust.touched(now);
        self.trusts.update(touched.clone()).await?;
        tracing::info!(
            user_id = %touched.user_id,
            trust_id = %touched.id,
            event = "device_trust_verified",
            "Device trust verified; MFA bypassed"
        );
        Ok(Some(touched))
    }

    /// Live trusts for a user, newest first. `current_token` marks the
    /// entry backing the caller's own session.
    pub async fn list_devices(
        &self,
        user_id: Uuid,
        current_token: Option<&str>,
    ) -> DomainResult<Vec<DeviceView>> {
        let now = self.clock.now();
        let current_hash = current_token.map(hash_token);

        let mut trusts: Vec<DeviceTrust> = self
            .trusts
            .find_by_user(user_id)
            .await?
            .into_iter()
            .filter(|t| !t.is_expired(now))
            .collect();
        trusts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(trusts
            .into_iter()
            .map(|t| DeviceView {
                id: t.id,
                created_at: t.created_at,
                last_used_at: t.last_used_at,
                expires_at: t.expires_at,
                is_current: current_hash.as_deref() == Some(t.token_hash.as_str()),
            })
            .collect())
    }

    /// Revoke one trust. The ownership check is separate from the lookup:
    /// a trust belonging to another user is `Unauthorized`, not `NotFound`.
    pub async fn revoke_device(&self, user_id: Uuid, trust_id: Uuid) -> DomainResult<()> {
        let trust = self
            .trusts
            .find_by_id(trust_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                resource: format!("device trust {}", trust_id),
            })?;

        if trust.user_id != user_id {
            tracing::warn!(
                user_id = %user_id,
                trust_id = %trust_id,
                event = "device_trust_revoke_denied",
                "Revocation attempted on another user's trust"
            );
            return Err(DomainError::Unauthorized);
        }

        self.trusts.delete(trust_id).await?;
        tracing::info!(
            user_id = %user_id,
            trust_id = %trust_id,
            event = "device_trust_revoked",
            "Device trust revoked"
        );
        Ok(())
    }

    /// Revoke every trust for a user. The external trigger is a
    /// credential change.
    pub async fn revoke_all_devices(&self, user_id: Uuid, reason: &str) -> DomainResult<usize> {
        let removed = self.trusts.delete_for_user(user_id).await?;
        tracing::info!(
            user_id = %user_id,
            removed,
            reason,
            event = "device_trust_revoked_all",
            "All device trusts revoked"
        );
        Ok(removed)
    }

    /// Storage-hygiene sweep over expired trusts.
    pub async fn purge_expired(&self) -> DomainResult<usize> {
        let now = self.clock.now();
        let removed = self.trusts.delete_expired(now).await?;
        if removed > 0 {
            tracing::debug!(removed, event = "device_trust_purge", "Purged expired trusts");
        }
        Ok(removed)
    }
}
