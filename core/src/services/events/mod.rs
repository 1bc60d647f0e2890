//! Outbound event publication seam.

use async_trait::async_trait;

use crate::domain::events::AuthEvent;

/// Sink for security-event facts
///
/// Publication is best-effort: the orchestrator publishes from a spawned
/// task and only logs failures, so implementations may be slow or flaky
/// without affecting signin outcomes.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: AuthEvent) -> Result<(), String>;
}

/// Publisher that drops events, for deployments without an event sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, event: AuthEvent) -> Result<(), String> {
        tracing::debug!(
            kind = event.kind(),
            event = "auth_event_dropped",
            "No event sink configured; dropping event"
        );
        Ok(())
    }
}
