//! Collaborator seams for signin orchestration.

use async_trait::async_trait;
use uuid::Uuid;

/// Session issuance after successful authentication
///
/// The artifact is opaque to the orchestrator (a JWT, a session id, a
/// cookie value); issuance failures are infrastructure faults, never
/// business outcomes.
#[async_trait]
pub trait SessionIssuer: Send + Sync {
    async fn issue_session(&self, user_id: Uuid) -> Result<String, String>;
}
