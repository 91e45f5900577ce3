use std::sync::Arc;

use async_trait::async_trait;
use audienceos_core::{AppError, AppResult, TenantId, UserIdentity};
use audienceos_domain::client::{Client, MessageChannel, PipelineStage};
use audienceos_domain::security::{AuditAction, PermissionAction, resources};
use audienceos_domain::trigger::TriggerEvent;
use chrono::Utc;
use uuid::Uuid;

use crate::{AuditEvent, AuditRepository, AuthorizationService, WorkflowService};

/// Input payload for client creation.
#[derive(Debug, Clone)]
pub struct CreateClientInput {
    /// Client name.
    pub name: String,
    /// Company behind the account.
    pub company: Option<String>,
    /// Subject of the account owner.
    pub owner: Option<String>,
    /// Starting pipeline stage; defaults to lead.
    pub stage: Option<PipelineStage>,
}

/// Repository port for client records.
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Saves one client record, overwriting any previous version.
    async fn save_client(&self, tenant_id: TenantId, client: Client) -> AppResult<()>;

    /// Lists clients for a tenant.
    async fn list_clients(&self, tenant_id: TenantId) -> AppResult<Vec<Client>>;

    /// Returns one client by identifier.
    async fn find_client(
        &self,
        tenant_id: TenantId,
        client_id: &str,
    ) -> AppResult<Option<Client>>;
}

/// Application service for the client pipeline.
#[derive(Clone)]
pub struct ClientService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn ClientRepository>,
    workflow_service: WorkflowService,
    audit_repository: Arc<dyn AuditRepository>,
}

impl ClientService {
    /// Creates a client service.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn ClientRepository>,
        workflow_service: WorkflowService,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            repository,
            workflow_service,
            audit_repository,
        }
    }

    /// Creates a client record.
    pub async fn create_client(
        &self,
        actor: &UserIdentity,
        input: CreateClientInput,
    ) -> AppResult<Client> {
        self.authorization_service
            .require_permission(actor, resources::CLIENTS, PermissionAction::Write, None)
            .await?;

        let client = Client::new(
            Uuid::new_v4().to_string(),
            &input.name,
            input.company,
            input.owner,
            input.stage.unwrap_or(PipelineStage::Lead),
            Utc::now(),
        )?;
        self.repository
            .save_client(actor.tenant_id(), client.clone())
            .await?;

        self.audit_repository
            .append_event(AuditEvent {
                tenant_id: actor.tenant_id(),
                subject: actor.subject().to_owned(),
                action: AuditAction::ClientCreated,
                resource_type: "client".to_owned(),
                resource_id: client.id().to_owned(),
                detail: Some(format!(
                    "created client '{}' in stage '{}'",
                    client.name(),
                    client.stage().as_str()
                )),
            })
            .await?;

        Ok(client)
    }

    /// Lists clients.
    pub async fn list_clients(&self, actor: &UserIdentity) -> AppResult<Vec<Client>> {
        self.authorization_service
            .require_permission(actor, resources::CLIENTS, PermissionAction::Read, None)
            .await?;
        self.repository.list_clients(actor.tenant_id()).await
    }

    /// Returns one client.
    pub async fn get_client(&self, actor: &UserIdentity, client_id: &str) -> AppResult<Client> {
        self.authorization_service
            .require_permission(
                actor,
                resources::CLIENTS,
                PermissionAction::Read,
                Some(client_id),
            )
            .await?;
        self.find_client(actor.tenant_id(), client_id).await
    }

    /// Moves a client to another pipeline stage and dispatches the matching
    /// workflow trigger event.
    pub async fn move_stage(
        &self,
        actor: &UserIdentity,
        client_id: &str,
        stage: PipelineStage,
    ) -> AppResult<Client> {
        self.authorization_service
            .require_permission(
                actor,
                resources::CLIENTS,
                PermissionAction::Write,
                Some(client_id),
            )
            .await?;

        let client = self.find_client(actor.tenant_id(), client_id).await?;
        let from_stage = client.stage();
        if from_stage == stage {
            return Err(AppError::Validation(format!(
                "client '{client_id}' is already in stage '{}'",
                stage.as_str()
            )));
        }

        let moved = client.with_stage(stage, Utc::now());
        self.repository
            .save_client(actor.tenant_id(), moved.clone())
            .await?;

        self.audit_repository
            .append_event(AuditEvent {
                tenant_id: actor.tenant_id(),
                subject: actor.subject().to_owned(),
                action: AuditAction::ClientStageMoved,
                resource_type: "client".to_owned(),
                resource_id: moved.id().to_owned(),
                detail: Some(format!(
                    "moved client '{}' from '{}' to '{}'",
                    moved.name(),
                    from_stage.as_str(),
                    stage.as_str()
                )),
            })
            .await?;

        self.workflow_service
            .dispatch_event(
                actor,
                &TriggerEvent::StageChanged {
                    client_id: moved.id().to_owned(),
                    from_stage,
                    to_stage: stage,
                },
            )
            .await?;

        Ok(moved)
    }

    /// Records an inbound message for a client and dispatches the matching
    /// workflow trigger event.
    pub async fn record_message(
        &self,
        actor: &UserIdentity,
        client_id: &str,
        channel: MessageChannel,
    ) -> AppResult<Client> {
        self.authorization_service
            .require_permission(
                actor,
                resources::CLIENTS,
                PermissionAction::Write,
                Some(client_id),
            )
            .await?;

        let client = self.find_client(actor.tenant_id(), client_id).await?;
        let touched = client.touched(Utc::now());
        self.repository
            .save_client(actor.tenant_id(), touched.clone())
            .await?;

        self.audit_repository
            .append_event(AuditEvent {
                tenant_id: actor.tenant_id(),
                subject: actor.subject().to_owned(),
                action: AuditAction::ClientMessageLogged,
                resource_type: "client".to_owned(),
                resource_id: touched.id().to_owned(),
                detail: Some(format!(
                    "logged {} message for client '{}'",
                    channel.as_str(),
                    touched.name()
                )),
            })
            .await?;

        self.workflow_service
            .dispatch_event(
                actor,
                &TriggerEvent::MessageReceived {
                    client_id: touched.id().to_owned(),
                    channel,
                },
            )
            .await?;

        Ok(touched)
    }

    async fn find_client(&self, tenant_id: TenantId, client_id: &str) -> AppResult<Client> {
        self.repository
            .find_client(tenant_id, client_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "client '{client_id}' does not exist for tenant '{tenant_id}'"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use audienceos_core::{AppError, AppResult, TenantId, UserIdentity};
    use audienceos_domain::security::{AuditAction, EffectivePermission, PermissionAction, resources};
    use audienceos_domain::workflow::{NotificationChannel, WorkflowAction, WorkflowDefinition};
    use serde_json::json;
    use tokio::sync::Mutex;

    use crate::workflow_service::{SaveTriggerInput, SaveWorkflowInput, WorkflowRepository};
    use crate::{
        AuditEvent, AuditRepository, AuthorizationRepository, AuthorizationService, WorkflowService,
    };

    use super::{
        Client, ClientRepository, ClientService, CreateClientInput, MessageChannel, PipelineStage,
    };

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
    struct FakeClientRepository {
        clients: Mutex<HashMap<(TenantId, String), Client>>,
    }

    #[async_trait]
    impl ClientRepository for FakeClientRepository {
        async fn save_client(&self, tenant_id: TenantId, client: Client) -> AppResult<()> {
            self.clients
                .lock()
                .await
                .insert((tenant_id, client.id().to_owned()), client);
            Ok(())
        }

        async fn list_clients(&self, tenant_id: TenantId) -> AppResult<Vec<Client>> {
            Ok(self
                .clients
                .lock()
                .await
                .iter()
                .filter(|((stored_tenant_id, _), _)| *stored_tenant_id == tenant_id)
                .map(|(_, client)| client.clone())
                .collect())
        }

        async fn find_client(
            &self,
            tenant_id: TenantId,
            client_id: &str,
        ) -> AppResult<Option<Client>> {
            Ok(self
                .clients
                .lock()
                .await
                .get(&(tenant_id, client_id.to_owned()))
                .cloned())
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

    struct Harness {
        service: ClientService,
        workflow_service: WorkflowService,
        audit_repository: Arc<RecordingAuditRepository>,
    }

    fn manager_grants(tenant_id: TenantId) -> HashMap<(TenantId, String), Vec<EffectivePermission>> {
        HashMap::from([(
            (tenant_id, "ana".to_owned()),
            vec![
                EffectivePermission::from_role(
                    resources::CLIENTS,
                    PermissionAction::Manage,
                    "role-admin",
                ),
                EffectivePermission::from_role(
                    resources::WORKFLOWS,
                    PermissionAction::Manage,
                    "role-admin",
                ),
            ],
        )])
    }

    fn build_harness(grants: HashMap<(TenantId, String), Vec<EffectivePermission>>) -> Harness {
        let audit_repository = Arc::new(RecordingAuditRepository::default());
        let authorization_service =
            AuthorizationService::new(Arc::new(FakeAuthorizationRepository { grants }));
        let workflow_service = WorkflowService::new(
            authorization_service.clone(),
            Arc::new(FakeWorkflowRepository::default()),
            audit_repository.clone(),
        );
        let service = ClientService::new(
            authorization_service,
            Arc::new(FakeClientRepository::default()),
            workflow_service.clone(),
            audit_repository.clone(),
        );
        Harness {
            service,
            workflow_service,
            audit_repository,
        }
    }

    fn actor(tenant_id: TenantId, subject: &str) -> UserIdentity {
        UserIdentity::new(subject, subject, None, tenant_id)
    }

    fn client_input(name: &str) -> CreateClientInput {
        CreateClientInput {
            name: name.to_owned(),
            company: None,
            owner: None,
            stage: None,
        }
    }

    #[tokio::test]
    async fn create_client_defaults_to_the_lead_stage() {
        let tenant_id = TenantId::new();
        let harness = build_harness(manager_grants(tenant_id));
        let ana = actor(tenant_id, "ana");

        let client = harness
            .service
            .create_client(&ana, client_input("Meridian Media"))
            .await
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(client.stage(), PipelineStage::Lead);
        let events = harness.audit_repository.events.lock().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, AuditAction::ClientCreated);
    }

    #[tokio::test]
    async fn create_client_requires_write_permission() {
        let tenant_id = TenantId::new();
        let harness = build_harness(HashMap::new());

        let result = harness
            .service
            .create_client(&actor(tenant_id, "ana"), client_input("Meridian Media"))
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn move_stage_rejects_no_op_moves() {
        let tenant_id = TenantId::new();
        let harness = build_harness(manager_grants(tenant_id));
        let ana = actor(tenant_id, "ana");
        let client = harness
            .service
            .create_client(&ana, client_input("Meridian Media"))
            .await
            .unwrap_or_else(|_| unreachable!());

        let result = harness
            .service
            .move_stage(&ana, client.id(), PipelineStage::Lead)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn move_stage_dispatches_matching_workflows() {
        let tenant_id = TenantId::new();
        let harness = build_harness(manager_grants(tenant_id));
        let ana = actor(tenant_id, "ana");

        harness
            .workflow_service
            .create_workflow(
                &ana,
                SaveWorkflowInput {
                    name: "Go live announcement".to_owned(),
                    description: None,
                    trigger: SaveTriggerInput {
                        id: None,
                        name: "Client went live".to_owned(),
                        trigger_type: "stage_change".to_owned(),
                        config: json!({ "to_stage": "active" }),
                    },
                    actions: vec![WorkflowAction::SendNotification {
                        channel: NotificationChannel::Slack,
                        message: "A client just went live".to_owned(),
                    }],
                    is_enabled: true,
                },
            )
            .await
            .unwrap_or_else(|_| unreachable!());

        let client = harness
            .service
            .create_client(&ana, client_input("Meridian Media"))
            .await
            .unwrap_or_else(|_| unreachable!());
        let moved = harness
            .service
            .move_stage(&ana, client.id(), PipelineStage::Active)
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(moved.stage(), PipelineStage::Active);

        let events = harness.audit_repository.events.lock().await;
        let matched = events
            .iter()
            .filter(|event| event.action == AuditAction::WorkflowTriggerMatched)
            .count();
        assert_eq!(matched, 1);
    }

    #[tokio::test]
    async fn move_stage_reports_missing_clients() {
        let tenant_id = TenantId::new();
        let harness = build_harness(manager_grants(tenant_id));

        let result = harness
            .service
            .move_stage(
                &actor(tenant_id, "ana"),
                "client-missing",
                PipelineStage::Active,
            )
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn record_message_touches_activity_and_audits() {
        let tenant_id = TenantId::new();
        let harness = build_harness(manager_grants(tenant_id));
        let ana = actor(tenant_id, "ana");
        let client = harness
            .service
            .create_client(&ana, client_input("Meridian Media"))
            .await
            .unwrap_or_else(|_| unreachable!());
        let before = client.last_activity_at();

        let touched = harness
            .service
            .record_message(&ana, client.id(), MessageChannel::Slack)
            .await
            .unwrap_or_else(|_| unreachable!());
        assert!(touched.last_activity_at() >= before);

        let events = harness.audit_repository.events.lock().await;
        assert!(
            events
                .iter()
                .any(|event| event.action == AuditAction::ClientMessageLogged)
        );
    }

    #[tokio::test]
    async fn client_scoped_writer_cannot_touch_other_clients() {
        let tenant_id = TenantId::new();
        let mut grants = manager_grants(tenant_id);
        grants.insert(
            (tenant_id, "sam".to_owned()),
            vec![EffectivePermission::from_client_access(
                resources::CLIENTS,
                PermissionAction::Write,
                "client-known",
            )],
        );
        let harness = build_harness(grants);
        let ana = actor(tenant_id, "ana");
        let client = harness
            .service
            .create_client(&ana, client_input("Meridian Media"))
            .await
            .unwrap_or_else(|_| unreachable!());

        let result = harness
            .service
            .move_stage(&actor(tenant_id, "sam"), client.id(), PipelineStage::Active)
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
