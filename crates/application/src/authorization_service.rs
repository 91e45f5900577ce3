use std::sync::Arc;

use async_trait::async_trait;
use audienceos_core::{AppError, AppResult, TenantId, UserIdentity};
use audienceos_domain::security::{EffectivePermission, PermissionAction, check_permission};

/// Repository port for permission lookups.
///
/// Implementations return the already flattened grant rows for one subject;
/// merging roles and client assignments into [`EffectivePermission`] rows is
/// their concern, deciding is the service's.
#[async_trait]
pub trait AuthorizationRepository: Send + Sync {
    /// Lists effective permissions for a subject in a tenant.
    async fn list_effective_permissions(
        &self,
        tenant_id: TenantId,
        subject: &str,
    ) -> AppResult<Vec<EffectivePermission>>;
}

/// Application service for tenant-scoped authorization checks.
#[derive(Clone)]
pub struct AuthorizationService {
    repository: Arc<dyn AuthorizationRepository>,
}

impl AuthorizationService {
    /// Creates an authorization service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AuthorizationRepository>) -> Self {
        Self { repository }
    }

    /// Ensures the actor may perform an action, optionally on one specific
    /// resource instance.
    pub async fn require_permission(
        &self,
        actor: &UserIdentity,
        resource: &str,
        action: PermissionAction,
        resource_id: Option<&str>,
    ) -> AppResult<()> {
        if self
            .has_permission(actor, resource, action, resource_id)
            .await?
        {
            return Ok(());
        }
        Err(AppError::Forbidden(format!(
            "subject '{}' is missing permission '{}:{}' in tenant '{}'",
            actor.subject(),
            resource,
            action.as_str(),
            actor.tenant_id()
        )))
    }

    /// Returns whether the actor currently holds the permission.
    pub async fn has_permission(
        &self,
        actor: &UserIdentity,
        resource: &str,
        action: PermissionAction,
        resource_id: Option<&str>,
    ) -> AppResult<bool> {
        let permissions = self
            .repository
            .list_effective_permissions(actor.tenant_id(), actor.subject())
            .await?;
        Ok(check_permission(
            &permissions,
            resource,
            action,
            resource_id,
        ))
    }

    /// Lists the actor's own effective permissions.
    pub async fn list_permissions(
        &self,
        actor: &UserIdentity,
    ) -> AppResult<Vec<EffectivePermission>> {
        self.repository
            .list_effective_permissions(actor.tenant_id(), actor.subject())
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use audienceos_core::{AppError, AppResult, TenantId, UserIdentity};
    use audienceos_domain::security::{EffectivePermission, PermissionAction, resources};

    use super::{AuthorizationRepository, AuthorizationService};

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

    fn service_with(
        grants: HashMap<(TenantId, String), Vec<EffectivePermission>>,
    ) -> AuthorizationService {
        AuthorizationService::new(Arc::new(FakeAuthorizationRepository { grants }))
    }

    fn actor(tenant_id: TenantId, subject: &str) -> UserIdentity {
        UserIdentity::new(subject, subject, None, tenant_id)
    }

    #[tokio::test]
    async fn require_permission_allows_granted_subject() {
        let tenant_id = TenantId::new();
        let service = service_with(HashMap::from([(
            (tenant_id, "ana".to_owned()),
            vec![EffectivePermission::from_role(
                resources::CLIENTS,
                PermissionAction::Read,
                "role-analyst",
            )],
        )]));

        let result = service
            .require_permission(
                &actor(tenant_id, "ana"),
                resources::CLIENTS,
                PermissionAction::Read,
                None,
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn require_permission_denies_with_a_named_subject() {
        let tenant_id = TenantId::new();
        let service = service_with(HashMap::new());

        let result = service
            .require_permission(
                &actor(tenant_id, "ana"),
                resources::TICKETS,
                PermissionAction::Write,
                None,
            )
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(message))
            if message.contains("'ana'") && message.contains("tickets:write")));
    }

    #[tokio::test]
    async fn grants_stay_inside_their_tenant() {
        let home = TenantId::new();
        let elsewhere = TenantId::new();
        let service = service_with(HashMap::from([(
            (home, "ana".to_owned()),
            vec![EffectivePermission::from_role(
                resources::CLIENTS,
                PermissionAction::Manage,
                "role-admin",
            )],
        )]));

        let allowed = service
            .has_permission(
                &actor(home, "ana"),
                resources::CLIENTS,
                PermissionAction::Delete,
                None,
            )
            .await;
        assert_eq!(allowed.ok(), Some(true));

        let denied = service
            .has_permission(
                &actor(elsewhere, "ana"),
                resources::CLIENTS,
                PermissionAction::Delete,
                None,
            )
            .await;
        assert_eq!(denied.ok(), Some(false));
    }

    #[tokio::test]
    async fn client_scoped_grant_guards_other_instances() {
        let tenant_id = TenantId::new();
        let service = service_with(HashMap::from([(
            (tenant_id, "sam".to_owned()),
            vec![EffectivePermission::from_client_access(
                resources::CLIENTS,
                PermissionAction::Write,
                "client-7",
            )],
        )]));
        let sam = actor(tenant_id, "sam");

        let own = service
            .require_permission(
                &sam,
                resources::CLIENTS,
                PermissionAction::Write,
                Some("client-7"),
            )
            .await;
        assert!(own.is_ok());

        let other = service
            .require_permission(
                &sam,
                resources::CLIENTS,
                PermissionAction::Write,
                Some("client-8"),
            )
            .await;
        assert!(matches!(other, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn list_permissions_returns_the_callers_rows() {
        let tenant_id = TenantId::new();
        let rows = vec![EffectivePermission::from_role(
            resources::WORKFLOWS,
            PermissionAction::Read,
            "role-analyst",
        )];
        let service = service_with(HashMap::from([(
            (tenant_id, "ana".to_owned()),
            rows.clone(),
        )]));

        let listed = service.list_permissions(&actor(tenant_id, "ana")).await;
        assert_eq!(listed.ok(), Some(rows));
    }
}
