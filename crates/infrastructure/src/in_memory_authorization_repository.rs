use std::collections::HashMap;

use async_trait::async_trait;
use audienceos_application::AuthorizationRepository;
use audienceos_core::{AppResult, TenantId};
use audienceos_domain::security::EffectivePermission;
use tokio::sync::RwLock;

/// In-memory authorization repository implementation.
///
/// Grants are appended through [`grant`](Self::grant), which the API uses to
/// seed the bootstrap admin at startup.
#[derive(Debug, Default)]
pub struct InMemoryAuthorizationRepository {
    grants: RwLock<HashMap<(TenantId, String), Vec<EffectivePermission>>>,
}

impl InMemoryAuthorizationRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grants: RwLock::new(HashMap::new()),
        }
    }

    /// Appends one grant for a subject.
    pub async fn grant(&self, tenant_id: TenantId, subject: &str, permission: EffectivePermission) {
        self.grants
            .write()
            .await
            .entry((tenant_id, subject.to_owned()))
            .or_default()
            .push(permission);
    }
}

#[async_trait]
impl AuthorizationRepository for InMemoryAuthorizationRepository {
    async fn list_effective_permissions(
        &self,
        tenant_id: TenantId,
        subject: &str,
    ) -> AppResult<Vec<EffectivePermission>> {
        Ok(self
            .grants
            .read()
            .await
            .get(&(tenant_id, subject.to_owned()))
            .cloned()
            .unwrap_or_default())
    }
}
