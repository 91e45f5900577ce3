use std::sync::Arc;

use async_trait::async_trait;
use audienceos_core::{AppError, AppResult, TenantId, UserIdentity};
use audienceos_domain::cartridge::Cartridge;
use audienceos_domain::security::{AuditAction, PermissionAction, resources};
use chrono::Utc;
use uuid::Uuid;

use crate::client_service::ClientRepository;
use crate::{AuditEvent, AuditRepository, AuthorizationService};

/// Input payload for drafting an instruction cartridge.
#[derive(Debug, Clone)]
pub struct SaveCartridgeInput {
    /// Client the cartridge is pinned to; `None` for a workspace default.
    pub client_id: Option<String>,
    /// Cartridge name shown in pickers.
    pub name: String,
    /// Instruction text; drafts may leave this empty.
    pub instructions: String,
}

/// Input payload for rewriting an existing cartridge.
#[derive(Debug, Clone)]
pub struct UpdateCartridgeInput {
    /// Replacement name.
    pub name: String,
    /// Replacement instruction text.
    pub instructions: String,
}

/// Repository port for instruction cartridges.
#[async_trait]
pub trait CartridgeRepository: Send + Sync {
    /// Saves one cartridge, overwriting any previous version.
    async fn save_cartridge(&self, tenant_id: TenantId, cartridge: Cartridge) -> AppResult<()>;

    /// Lists cartridges for a tenant.
    async fn list_cartridges(&self, tenant_id: TenantId) -> AppResult<Vec<Cartridge>>;

    /// Returns one cartridge by identifier.
    async fn find_cartridge(
        &self,
        tenant_id: TenantId,
        cartridge_id: &str,
    ) -> AppResult<Option<Cartridge>>;
}

/// Application service for instruction cartridges.
#[derive(Clone)]
pub struct CartridgeService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn CartridgeRepository>,
    client_repository: Arc<dyn ClientRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl CartridgeService {
    /// Creates a cartridge service.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn CartridgeRepository>,
        client_repository: Arc<dyn ClientRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            repository,
            client_repository,
            audit_repository,
        }
    }

    /// Drafts a new cartridge, pinned to a client or workspace wide.
    pub async fn save_cartridge(
        &self,
        actor: &UserIdentity,
        input: SaveCartridgeInput,
    ) -> AppResult<Cartridge> {
        self.authorization_service
            .require_permission(
                actor,
                resources::CARTRIDGES,
                PermissionAction::Write,
                input.client_id.as_deref(),
            )
            .await?;

        if let Some(client_id) = input
            .client_id
            .as_deref()
            .filter(|value| !value.trim().is_empty())
        {
            if self
                .client_repository
                .find_client(actor.tenant_id(), client_id)
                .await?
                .is_none()
            {
                return Err(AppError::NotFound(format!(
                    "client '{client_id}' does not exist for tenant '{}'",
                    actor.tenant_id()
                )));
            }
        }

        let cartridge = Cartridge::draft(
            Uuid::new_v4().to_string(),
            input.client_id,
            &input.name,
            input.instructions,
            Utc::now(),
        )?;
        self.repository
            .save_cartridge(actor.tenant_id(), cartridge.clone())
            .await?;
        self.append_cartridge_event(actor, &cartridge, AuditAction::CartridgeSaved, "drafted")
            .await?;
        Ok(cartridge)
    }

    /// Lists cartridges for the actor's tenant.
    pub async fn list_cartridges(&self, actor: &UserIdentity) -> AppResult<Vec<Cartridge>> {
        self.authorization_service
            .require_permission(actor, resources::CARTRIDGES, PermissionAction::Read, None)
            .await?;
        self.repository.list_cartridges(actor.tenant_id()).await
    }

    /// Rewrites a cartridge's name and instructions.
    pub async fn update_cartridge(
        &self,
        actor: &UserIdentity,
        cartridge_id: &str,
        input: UpdateCartridgeInput,
    ) -> AppResult<Cartridge> {
        let cartridge = self.require_write(actor, cartridge_id).await?;
        let updated = cartridge.edited(&input.name, input.instructions, Utc::now())?;
        self.repository
            .save_cartridge(actor.tenant_id(), updated.clone())
            .await?;
        self.append_cartridge_event(actor, &updated, AuditAction::CartridgeSaved, "updated")
            .await?;
        Ok(updated)
    }

    /// Puts a cartridge live for its client.
    pub async fn activate_cartridge(
        &self,
        actor: &UserIdentity,
        cartridge_id: &str,
    ) -> AppResult<Cartridge> {
        let cartridge = self.require_write(actor, cartridge_id).await?;
        let activated = cartridge.activated(Utc::now())?;
        self.repository
            .save_cartridge(actor.tenant_id(), activated.clone())
            .await?;
        self.append_cartridge_event(actor, &activated, AuditAction::CartridgeActivated, "activated")
            .await?;
        Ok(activated)
    }

    /// Retires a cartridge from use.
    pub async fn archive_cartridge(
        &self,
        actor: &UserIdentity,
        cartridge_id: &str,
    ) -> AppResult<Cartridge> {
        let cartridge = self.require_write(actor, cartridge_id).await?;
        let archived = cartridge.archived(Utc::now());
        self.repository
            .save_cartridge(actor.tenant_id(), archived.clone())
            .await?;
        self.append_cartridge_event(actor, &archived, AuditAction::CartridgeArchived, "archived")
            .await?;
        Ok(archived)
    }

    async fn require_write(
        &self,
        actor: &UserIdentity,
        cartridge_id: &str,
    ) -> AppResult<Cartridge> {
        let cartridge = self
            .repository
            .find_cartridge(actor.tenant_id(), cartridge_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "cartridge '{cartridge_id}' does not exist for tenant '{}'",
                    actor.tenant_id()
                ))
            })?;
        self.authorization_service
            .require_permission(
                actor,
                resources::CARTRIDGES,
                PermissionAction::Write,
                cartridge.client_id(),
            )
            .await?;
        Ok(cartridge)
    }

    async fn append_cartridge_event(
        &self,
        actor: &UserIdentity,
        cartridge: &Cartridge,
        action: AuditAction,
        verb: &str,
    ) -> AppResult<()> {
        let scope = cartridge
            .client_id()
            .map_or_else(|| "the workspace".to_owned(), |id| format!("client '{id}'"));
        self.audit_repository
            .append_event(AuditEvent {
                tenant_id: actor.tenant_id(),
                subject: actor.subject().to_owned(),
                action,
                resource_type: "cartridge".to_owned(),
                resource_id: cartridge.id().to_owned(),
                detail: Some(format!("{verb} cartridge '{}' for {scope}", cartridge.name())),
            })
            .await
    }
}
