use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use audienceos_core::{AppError, AppResult, TenantId, UserIdentity};
use audienceos_domain::client::PipelineStage;
use audienceos_domain::security::{AuditAction, EffectivePermission, PermissionAction, resources};
use audienceos_domain::trigger::TriggerEvent;
use audienceos_domain::workflow::{NotificationChannel, WorkflowAction, WorkflowDefinition};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use crate::{AuditEvent, AuditRepository, AuthorizationRepository, AuthorizationService};

use super::{SaveTriggerInput, SaveWorkflowInput, WorkflowRepository, WorkflowService};

#[derive(Default)]
struct RecordingAuditRepository {
    events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditRepository for RecordingAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

struct FakeAuthorizationRepository {
    grants: HashMap<(TenantId, String), Vec<EffectivePermission>>,
}

#[async_trait]
impl AuthorizationRepository for FakeAuthorizationRepository {
    async fn list_effective_permissions(
        &self,
        tenant_id: TenantId,
        subject: &str,
    ) -> AppResult<Vec<EffectivePermission>> {
        Ok(self
            .grants
            .get(&(tenant_id, subject.to_owned()))
            .cloned()
            .unwrap_or_default())
    }
}

#[derive(Default)]
struct FakeWorkflowRepository {
    workflows: Mutex<HashMap<(TenantId, String), WorkflowDefinition>>,
}

#[async_trait]
impl WorkflowRepository for FakeWorkflowRepository {
    async fn save_workflow(
        &self,
        tenant_id: TenantId,
        workflow: WorkflowDefinition,
    ) -> AppResult<()> {
        self.workflows
            .lock()
            .await
            .insert((tenant_id, workflow.id().to_owned()), workflow);
        Ok(())
    }

    async fn list_workflows(&self, tenant_id: TenantId) -> AppResult<Vec<WorkflowDefinition>> {
        Ok(self
            .workflows
            .lock()
            .await
            .iter()
            .filter(|((stored_tenant_id, _), _)| *stored_tenant_id == tenant_id)
            .map(|(_, workflow)| workflow.clone())
            .collect())
    }

    async fn find_workflow(
        &self,
        tenant_id: TenantId,
        workflow_id: &str,
    ) -> AppResult<Option<WorkflowDefinition>> {
        Ok(self
            .workflows
            .lock()
            .await
            .get(&(tenant_id, workflow_id.to_owned()))
            .cloned())
    }

    async fn list_enabled_workflows(
        &self,
        tenant_id: TenantId,
    ) -> AppResult<Vec<WorkflowDefinition>> {
        Ok(self
            .list_workflows(tenant_id)
            .await?
            .into_iter()
            .filter(WorkflowDefinition::is_enabled)
            .collect())
    }
}

fn build_service(
    grants: HashMap<(TenantId, String), Vec<EffectivePermission>>,
    repository: Arc<FakeWorkflowRepository>,
    audit_repository: Arc<RecordingAuditRepository>,
) -> WorkflowService {
    let authorization_service =
        AuthorizationService::new(Arc::new(FakeAuthorizationRepository { grants }));
    WorkflowService::new(authorization_service, repository, audit_repository)
}

fn maker_grants(tenant_id: TenantId) -> HashMap<(TenantId, String), Vec<EffectivePermission>> {
    HashMap::from([(
        (tenant_id, "maker".to_owned()),
        vec![EffectivePermission::from_role(
            resources::WORKFLOWS,
            PermissionAction::Manage,
            "role-admin",
        )],
    )])
}

fn stage_change_input(name: &str, is_enabled: bool) -> SaveWorkflowInput {
    trigger_input(name, "stage_change", json!({ "to_stage": "active" }), is_enabled)
}

fn trigger_input(
    name: &str,
    trigger_type: &str,
    config: Value,
    is_enabled: bool,
) -> SaveWorkflowInput {
    SaveWorkflowInput {
        name: name.to_owned(),
        description: None,
        trigger: SaveTriggerInput {
            id: None,
            name: format!("{name} trigger"),
            trigger_type: trigger_type.to_owned(),
            config,
        },
        actions: vec![WorkflowAction::SendNotification {
            channel: NotificationChannel::Slack,
            message: "A client just went live".to_owned(),
        }],
        is_enabled,
    }
}

#[tokio::test]
async fn create_workflow_persists_and_audits() {
    let tenant_id = TenantId::new();
    let actor = UserIdentity::new("maker", "maker", None, tenant_id);
    let repository = Arc::new(FakeWorkflowRepository::default());
    let audit_repository = Arc::new(RecordingAuditRepository::default());
    let service = build_service(
        maker_grants(tenant_id),
        repository.clone(),
        audit_repository.clone(),
    );

    let workflow = service
        .create_workflow(&actor, stage_change_input("Go live announcement", true))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(workflow.name(), "Go live announcement");
    assert_eq!(workflow.trigger().trigger_type().as_str(), "stage_change");
    assert_eq!(repository.workflows.lock().await.len(), 1);

    let events = audit_repository.events.lock().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, AuditAction::WorkflowSaved);
    assert_eq!(events[0].resource_id, workflow.id());
}

#[tokio::test]
async fn create_workflow_rejects_unknown_trigger_types() {
    let tenant_id = TenantId::new();
    let actor = UserIdentity::new("maker", "maker", None, tenant_id);
    let service = build_service(
        maker_grants(tenant_id),
        Arc::new(FakeWorkflowRepository::default()),
        Arc::new(RecordingAuditRepository::default()),
    );

    let result = service
        .create_workflow(&actor, trigger_input("Follow up", "follow_up", json!({}), true))
        .await;
    assert!(matches!(result, Err(AppError::Validation(message))
        if message == "Unknown trigger type: follow_up"));
}

#[tokio::test]
async fn create_workflow_joins_field_errors() {
    let tenant_id = TenantId::new();
    let actor = UserIdentity::new("maker", "maker", None, tenant_id);
    let service = build_service(
        maker_grants(tenant_id),
        Arc::new(FakeWorkflowRepository::default()),
        Arc::new(RecordingAuditRepository::default()),
    );

    let result = service
        .create_workflow(
            &actor,
            trigger_input(
                "Engagement floor",
                "kpi_threshold",
                json!({ "metric": "engagement_rate" }),
                true,
            ),
        )
        .await;
    assert!(matches!(result, Err(AppError::Validation(message))
        if message.contains("operator") && message.contains("value")));
}

#[tokio::test]
async fn create_workflow_requires_write_permission() {
    let tenant_id = TenantId::new();
    let reader = UserIdentity::new("reader", "reader", None, tenant_id);
    let grants = HashMap::from([(
        (tenant_id, "reader".to_owned()),
        vec![EffectivePermission::from_role(
            resources::WORKFLOWS,
            PermissionAction::Read,
            "role-analyst",
        )],
    )]);
    let repository = Arc::new(FakeWorkflowRepository::default());
    let service = build_service(
        grants,
        repository.clone(),
        Arc::new(RecordingAuditRepository::default()),
    );

    let result = service
        .create_workflow(&reader, stage_change_input("Go live announcement", true))
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert!(repository.workflows.lock().await.is_empty());
}

#[tokio::test]
async fn update_workflow_requires_an_existing_id() {
    let tenant_id = TenantId::new();
    let actor = UserIdentity::new("maker", "maker", None, tenant_id);
    let service = build_service(
        maker_grants(tenant_id),
        Arc::new(FakeWorkflowRepository::default()),
        Arc::new(RecordingAuditRepository::default()),
    );

    let result = service
        .update_workflow(&actor, "wf-missing", stage_change_input("Renamed", true))
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn update_workflow_replaces_the_definition() {
    let tenant_id = TenantId::new();
    let actor = UserIdentity::new("maker", "maker", None, tenant_id);
    let repository = Arc::new(FakeWorkflowRepository::default());
    let service = build_service(
        maker_grants(tenant_id),
        repository.clone(),
        Arc::new(RecordingAuditRepository::default()),
    );

    let created = service
        .create_workflow(&actor, stage_change_input("Go live announcement", true))
        .await
        .unwrap_or_else(|_| unreachable!());
    let updated = service
        .update_workflow(
            &actor,
            created.id(),
            stage_change_input("Go live celebration", false),
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(updated.id(), created.id());
    assert_eq!(updated.name(), "Go live celebration");
    assert!(!updated.is_enabled());
    assert_eq!(repository.workflows.lock().await.len(), 1);
}

#[tokio::test]
async fn dispatch_counts_only_matching_enabled_workflows() {
    let tenant_id = TenantId::new();
    let actor = UserIdentity::new("maker", "maker", None, tenant_id);
    let audit_repository = Arc::new(RecordingAuditRepository::default());
    let service = build_service(
        maker_grants(tenant_id),
        Arc::new(FakeWorkflowRepository::default()),
        audit_repository.clone(),
    );

    for input in [
        stage_change_input("Go live announcement", true),
        stage_change_input("Disabled twin", false),
        trigger_input("Inbox watcher", "new_message", json!({}), true),
    ] {
        service
            .create_workflow(&actor, input)
            .await
            .unwrap_or_else(|_| unreachable!());
    }

    let event = TriggerEvent::StageChanged {
        client_id: "client-1".to_owned(),
        from_stage: PipelineStage::Onboarding,
        to_stage: PipelineStage::Active,
    };
    let matched = service.dispatch_event(&actor, &event).await;
    assert_eq!(matched.ok(), Some(1));

    let events = audit_repository.events.lock().await;
    let matches = events
        .iter()
        .filter(|event| event.action == AuditAction::WorkflowTriggerMatched)
        .count();
    assert_eq!(matches, 1);
}

#[tokio::test]
async fn validate_trigger_passes_the_registry_result_through() {
    let tenant_id = TenantId::new();
    let service = build_service(
        maker_grants(tenant_id),
        Arc::new(FakeWorkflowRepository::default()),
        Arc::new(RecordingAuditRepository::default()),
    );

    let outcome = service.validate_trigger("inactivity", &json!({ "days": 0 }));
    assert!(!outcome.valid);
    assert_eq!(
        outcome.errors,
        vec!["Inactivity trigger requires days >= 1".to_owned()]
    );
}
