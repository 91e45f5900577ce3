use std::sync::Arc;

use async_trait::async_trait;
use audienceos_core::{AppError, AppResult, TenantId, UserIdentity};
use audienceos_domain::security::{AuditAction, PermissionAction, resources};
use audienceos_domain::ticket::{Ticket, TicketPriority, TicketStatus};
use audienceos_domain::trigger::TriggerEvent;
use chrono::Utc;
use uuid::Uuid;

use crate::client_service::ClientRepository;
use crate::{AuditEvent, AuditRepository, AuthorizationService, WorkflowService};

/// Input payload for opening a support ticket.
#[derive(Debug, Clone)]
pub struct CreateTicketInput {
    /// Client the ticket belongs to.
    pub client_id: String,
    /// One line summary.
    pub subject: String,
    /// Optional free form description.
    pub body: Option<String>,
    /// Filed priority; defaults to medium.
    pub priority: Option<TicketPriority>,
}

/// Repository port for support tickets.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Saves one ticket, overwriting any previous version.
    async fn save_ticket(&self, tenant_id: TenantId, ticket: Ticket) -> AppResult<()>;

    /// Lists tickets for a tenant, optionally narrowed to one client.
    async fn list_tickets(
        &self,
        tenant_id: TenantId,
        client_id: Option<&str>,
    ) -> AppResult<Vec<Ticket>>;

    /// Returns one ticket by identifier.
    async fn find_ticket(&self, tenant_id: TenantId, ticket_id: &str)
    -> AppResult<Option<Ticket>>;
}

/// Application service for support tickets.
#[derive(Clone)]
pub struct TicketService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn TicketRepository>,
    client_repository: Arc<dyn ClientRepository>,
    workflow_service: WorkflowService,
    audit_repository: Arc<dyn AuditRepository>,
}

impl TicketService {
    /// Creates a ticket service.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn TicketRepository>,
        client_repository: Arc<dyn ClientRepository>,
        workflow_service: WorkflowService,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            repository,
            client_repository,
            workflow_service,
            audit_repository,
        }
    }

    /// Opens a ticket for a client and dispatches the matching workflow
    /// trigger event.
    ///
    /// Ticket permissions are scoped by the owning client, so client access
    /// grants on tickets carry the client id.
    pub async fn create_ticket(
        &self,
        actor: &UserIdentity,
        input: CreateTicketInput,
    ) -> AppResult<Ticket> {
        self.authorization_service
            .require_permission(
                actor,
                resources::TICKETS,
                PermissionAction::Write,
                Some(&input.client_id),
            )
            .await?;

        if self
            .client_repository
            .find_client(actor.tenant_id(), &input.client_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "client '{}' does not exist for tenant '{}'",
                input.client_id,
                actor.tenant_id()
            )));
        }

        let ticket = Ticket::open(
            Uuid::new_v4().to_string(),
            input.client_id,
            &input.subject,
            input.body,
            input.priority.unwrap_or(TicketPriority::Medium),
            Utc::now(),
        )?;
        self.repository
            .save_ticket(actor.tenant_id(), ticket.clone())
            .await?;

        self.audit_repository
            .append_event(AuditEvent {
                tenant_id: actor.tenant_id(),
                subject: actor.subject().to_owned(),
                action: AuditAction::TicketOpened,
                resource_type: "ticket".to_owned(),
                resource_id: ticket.id().to_owned(),
                detail: Some(format!(
                    "opened '{}' at {} for client '{}'",
                    ticket.subject(),
                    ticket.priority().as_str(),
                    ticket.client_id()
                )),
            })
            .await?;

        self.workflow_service
            .dispatch_event(
                actor,
                &TriggerEvent::TicketOpened {
                    ticket_id: ticket.id().to_owned(),
                    client_id: ticket.client_id().to_owned(),
                    priority: ticket.priority(),
                },
            )
            .await?;

        Ok(ticket)
    }

    /// Lists tickets, optionally narrowed to one client.
    pub async fn list_tickets(
        &self,
        actor: &UserIdentity,
        client_id: Option<&str>,
    ) -> AppResult<Vec<Ticket>> {
        self.authorization_service
            .require_permission(actor, resources::TICKETS, PermissionAction::Read, client_id)
            .await?;
        self.repository
            .list_tickets(actor.tenant_id(), client_id)
            .await
    }

    /// Moves a ticket to another lifecycle status.
    pub async fn update_status(
        &self,
        actor: &UserIdentity,
        ticket_id: &str,
        status: TicketStatus,
    ) -> AppResult<Ticket> {
        let ticket = self
            .repository
            .find_ticket(actor.tenant_id(), ticket_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "ticket '{ticket_id}' does not exist for tenant '{}'",
                    actor.tenant_id()
                ))
            })?;

        self.authorization_service
            .require_permission(
                actor,
                resources::TICKETS,
                PermissionAction::Write,
                Some(ticket.client_id()),
            )
            .await?;

        let from_status = ticket.status();
        let updated = ticket.with_status(status)?;
        self.repository
            .save_ticket(actor.tenant_id(), updated.clone())
            .await?;

        self.audit_repository
            .append_event(AuditEvent {
                tenant_id: actor.tenant_id(),
                subject: actor.subject().to_owned(),
                action: AuditAction::TicketStatusChanged,
                resource_type: "ticket".to_owned(),
                resource_id: updated.id().to_owned(),
                detail: Some(format!(
                    "moved ticket '{}' from '{}' to '{}'",
                    updated.subject(),
                    from_status.as_str(),
                    status.as_str()
                )),
            })
            .await?;

        Ok(updated)
    }
}
