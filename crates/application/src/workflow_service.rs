use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use audienceos_core::{AppError, AppResult, TenantId, UserIdentity};
use audienceos_domain::security::{AuditAction, PermissionAction, resources};
use audienceos_domain::trigger::{
    TriggerConfig, TriggerEvent, TriggerType, TriggerValidation, WorkflowTrigger,
    validate_trigger_payload,
};
use audienceos_domain::workflow::{WorkflowAction, WorkflowDefinition, WorkflowDefinitionInput};
use serde_json::Value;
use uuid::Uuid;

use crate::{AuditEvent, AuditRepository, AuthorizationService};

mod definitions;
mod dispatch;

/// Raw trigger values as submitted by the workflow builder.
///
/// The type is a free string and the configuration an untyped payload so the
/// registry can report unknown types and missing fields as validation
/// results instead of decode failures.
#[derive(Debug, Clone)]
pub struct SaveTriggerInput {
    /// Builder assigned trigger identifier; generated when absent.
    pub id: Option<String>,
    /// Label the builder shows for the trigger.
    pub name: String,
    /// Canonical trigger type identifier.
    pub trigger_type: String,
    /// Untyped per-type configuration payload.
    pub config: Value,
}

/// Input payload for creating or updating a workflow definition.
#[derive(Debug, Clone)]
pub struct SaveWorkflowInput {
    /// Human readable workflow name.
    pub name: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Trigger as submitted by the builder.
    pub trigger: SaveTriggerInput,
    /// Actions performed when the trigger fires.
    pub actions: Vec<WorkflowAction>,
    /// Whether the workflow participates in dispatch.
    pub is_enabled: bool,
}

/// Repository port for workflow definitions.
#[async_trait]
pub trait WorkflowRepository: Send + Sync {
    /// Saves one workflow definition, overwriting any previous version.
    async fn save_workflow(
        &self,
        tenant_id: TenantId,
        workflow: WorkflowDefinition,
    ) -> AppResult<()>;

    /// Lists workflow definitions for a tenant.
    async fn list_workflows(&self, tenant_id: TenantId) -> AppResult<Vec<WorkflowDefinition>>;

    /// Returns one workflow by identifier.
    async fn find_workflow(
        &self,
        tenant_id: TenantId,
        workflow_id: &str,
    ) -> AppResult<Option<WorkflowDefinition>>;

    /// Lists the enabled workflows for a tenant.
    async fn list_enabled_workflows(
        &self,
        tenant_id: TenantId,
    ) -> AppResult<Vec<WorkflowDefinition>>;
}

/// Application service for workflow definitions and trigger dispatch.
#[derive(Clone)]
pub struct WorkflowService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn WorkflowRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl WorkflowService {
    /// Creates a workflow service.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn WorkflowRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            repository,
            audit_repository,
        }
    }
}

#[cfg(test)]
mod tests;
