use std::str::FromStr;

use audienceos_core::AppError;
use serde::{Deserialize, Serialize};

/// Canonical resource identifiers used in permission grants and route guards.
pub mod resources {
    /// Client roster and pipeline.
    pub const CLIENTS: &str = "clients";
    /// Support tickets.
    pub const TICKETS: &str = "tickets";
    /// Workflow definitions and the trigger palette.
    pub const WORKFLOWS: &str = "workflows";
    /// Instruction cartridges.
    pub const CARTRIDGES: &str = "cartridges";
}

/// Action requested against a resource, ordered so that `manage` covers the
/// other three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionAction {
    /// View the resource.
    Read,
    /// Create or update the resource.
    Write,
    /// Remove the resource.
    Delete,
    /// Administer the resource, implying read, write and delete.
    Manage,
}

impl PermissionAction {
    /// Returns the canonical identifier for this action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Delete => "delete",
            Self::Manage => "manage",
        }
    }

    /// Returns every action, weakest first.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PermissionAction] = &[
            PermissionAction::Read,
            PermissionAction::Write,
            PermissionAction::Delete,
            PermissionAction::Manage,
        ];
        ALL
    }

    /// Returns whether a grant of this action satisfies a request for
    /// `requested`.
    ///
    /// `manage` satisfies everything; the other actions only satisfy
    /// themselves. In particular `write` does not imply `read`.
    #[must_use]
    pub fn covers(self, requested: Self) -> bool {
        self == Self::Manage || self == requested
    }
}

impl FromStr for PermissionAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "delete" => Ok(Self::Delete),
            "manage" => Ok(Self::Manage),
            other => Err(AppError::Validation(format!(
                "unknown permission action '{other}'"
            ))),
        }
    }
}

/// Where an effective permission was granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionSource {
    /// Granted through a role the user holds; applies to the whole resource
    /// class.
    Role,
    /// Granted for one specific client record.
    ClientAccess,
}

impl PermissionSource {
    /// Returns the canonical identifier for this source.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Role => "role",
            Self::ClientAccess => "client_access",
        }
    }
}

/// One grant a user holds after their roles and client assignments have been
/// flattened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectivePermission {
    /// Resource class the grant applies to.
    pub resource: String,
    /// Action the grant allows.
    pub action: PermissionAction,
    /// Whether the grant came from a role or a client assignment.
    pub source: PermissionSource,
    /// Role that produced the grant, when the source is a role.
    pub role_id: Option<String>,
    /// Client the grant is scoped to, when the source is a client assignment.
    pub client_id: Option<String>,
}

impl EffectivePermission {
    /// Creates a role sourced grant covering the whole resource class.
    #[must_use]
    pub fn from_role(
        resource: impl Into<String>,
        action: PermissionAction,
        role_id: impl Into<String>,
    ) -> Self {
        Self {
            resource: resource.into(),
            action,
            source: PermissionSource::Role,
            role_id: Some(role_id.into()),
            client_id: None,
        }
    }

    /// Creates a grant scoped to a single client record.
    #[must_use]
    pub fn from_client_access(
        resource: impl Into<String>,
        action: PermissionAction,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            resource: resource.into(),
            action,
            source: PermissionSource::ClientAccess,
            role_id: None,
            client_id: Some(client_id.into()),
        }
    }

    fn applies_to(&self, resource_id: Option<&str>) -> bool {
        match self.source {
            PermissionSource::Role => true,
            PermissionSource::ClientAccess => match resource_id {
                None => true,
                Some(id) => self.client_id.as_deref() == Some(id),
            },
        }
    }
}

/// Decides whether a set of effective permissions allows an action.
///
/// A `resource_id` of `None` asks about the resource class as a whole, which
/// any grant on the class can satisfy. The empty set denies everything.
#[must_use]
pub fn check_permission(
    permissions: &[EffectivePermission],
    resource: &str,
    action: PermissionAction,
    resource_id: Option<&str>,
) -> bool {
    permissions
        .iter()
        .filter(|permission| permission.resource == resource)
        .any(|permission| permission.action.covers(action) && permission.applies_to(resource_id))
}

/// Recorded side effects that end up in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A client record was created.
    ClientCreated,
    /// A client moved between pipeline stages.
    ClientStageMoved,
    /// An inbound client message was recorded.
    ClientMessageLogged,
    /// A support ticket was opened.
    TicketOpened,
    /// A support ticket changed status.
    TicketStatusChanged,
    /// A workflow definition was created or updated.
    WorkflowSaved,
    /// A runtime event matched an enabled workflow trigger.
    WorkflowTriggerMatched,
    /// A cartridge was created or updated.
    CartridgeSaved,
    /// A cartridge went live for its client.
    CartridgeActivated,
    /// A cartridge was retired from use.
    CartridgeArchived,
}

impl AuditAction {
    /// Returns the dotted identifier stored with audit events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClientCreated => "client.created",
            Self::ClientStageMoved => "client.stage_moved",
            Self::ClientMessageLogged => "client.message_logged",
            Self::TicketOpened => "ticket.opened",
            Self::TicketStatusChanged => "ticket.status_changed",
            Self::WorkflowSaved => "workflow.saved",
            Self::WorkflowTriggerMatched => "workflow.trigger_matched",
            Self::CartridgeSaved => "cartridge.saved",
            Self::CartridgeActivated => "cartridge.activated",
            Self::CartridgeArchived => "cartridge.archived",
        }
    }
}
