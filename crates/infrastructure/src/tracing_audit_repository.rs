use async_trait::async_trait;
use audienceos_application::{AuditEvent, AuditRepository};
use audienceos_core::AppResult;
use tokio::sync::RwLock;
use tracing::info;

/// Audit repository that logs every event and keeps an in-memory tail.
///
/// Each event goes out as a structured tracing event; the tail can be read
/// back with [`events`](Self::events).
#[derive(Debug, Default)]
pub struct TracingAuditRepository {
    events: RwLock<Vec<AuditEvent>>,
}

impl TracingAuditRepository {
    /// Creates an empty audit repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
        }
    }

    /// Returns a snapshot of all recorded events, oldest first.
    pub async fn events(&self) -> Vec<AuditEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl AuditRepository for TracingAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        info!(
            tenant_id = %event.tenant_id,
            subject = %event.subject,
            action = event.action.as_str(),
            resource_type = %event.resource_type,
            resource_id = %event.resource_id,
            detail = event.detail.as_deref().unwrap_or(""),
            "audit event"
        );
        self.events.write().await.push(event);
        Ok(())
    }
}
