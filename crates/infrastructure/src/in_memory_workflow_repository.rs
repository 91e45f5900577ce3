use std::collections::HashMap;

use async_trait::async_trait;
use audienceos_application::WorkflowRepository;
use audienceos_core::{AppResult, TenantId};
use audienceos_domain::workflow::WorkflowDefinition;
use tokio::sync::RwLock;

/// In-memory workflow repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryWorkflowRepository {
    workflows: RwLock<HashMap<(TenantId, String), WorkflowDefinition>>,
}

impl InMemoryWorkflowRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            workflows: RwLock::new(HashMap::new()),
        }
    }

    async fn list_filtered(
        &self,
        tenant_id: TenantId,
        enabled_only: bool,
    ) -> Vec<WorkflowDefinition> {
        let workflows = self.workflows.read().await;
        let mut listed: Vec<WorkflowDefinition> = workflows
            .iter()
            .filter_map(|((stored_tenant_id, _), workflow)| {
                (stored_tenant_id == &tenant_id && (!enabled_only || workflow.is_enabled()))
                    .then_some(workflow.clone())
            })
            .collect();
        listed.sort_by(|left, right| left.name().cmp(right.name()));
        listed
    }
}

#[async_trait]
impl WorkflowRepository for InMemoryWorkflowRepository {
    async fn save_workflow(
        &self,
        tenant_id: TenantId,
        workflow: WorkflowDefinition,
    ) -> AppResult<()> {
        self.workflows
            .write()
            .await
            .insert((tenant_id, workflow.id().to_owned()), workflow);
        Ok(())
    }

    async fn list_workflows(&self, tenant_id: TenantId) -> AppResult<Vec<WorkflowDefinition>> {
        Ok(self.list_filtered(tenant_id, false).await)
    }

    async fn find_workflow(
        &self,
        tenant_id: TenantId,
        workflow_id: &str,
    ) -> AppResult<Option<WorkflowDefinition>> {
        Ok(self
            .workflows
            .read()
            .await
            .get(&(tenant_id, workflow_id.to_owned()))
            .cloned())
    }

    async fn list_enabled_workflows(
        &self,
        tenant_id: TenantId,
    ) -> AppResult<Vec<WorkflowDefinition>> {
        Ok(self.list_filtered(tenant_id, true).await)
    }
}
