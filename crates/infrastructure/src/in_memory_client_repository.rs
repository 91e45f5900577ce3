use std::collections::HashMap;

use async_trait::async_trait;
use audienceos_application::ClientRepository;
use audienceos_core::{AppResult, TenantId};
use audienceos_domain::client::Client;
use tokio::sync::RwLock;

/// In-memory client repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryClientRepository {
    clients: RwLock<HashMap<(TenantId, String), Client>>,
}

impl InMemoryClientRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ClientRepository for InMemoryClientRepository {
    async fn save_client(&self, tenant_id: TenantId, client: Client) -> AppResult<()> {
        self.clients
            .write()
            .await
            .insert((tenant_id, client.id().to_owned()), client);
        Ok(())
    }

    async fn list_clients(&self, tenant_id: TenantId) -> AppResult<Vec<Client>> {
        let clients = self.clients.read().await;
        let mut listed: Vec<Client> = clients
            .iter()
            .filter_map(|((stored_tenant_id, _), client)| {
                (stored_tenant_id == &tenant_id).then_some(client.clone())
            })
            .collect();
        listed.sort_by(|left, right| left.name().cmp(right.name()));
        Ok(listed)
    }

    async fn find_client(
        &self,
        tenant_id: TenantId,
        client_id: &str,
    ) -> AppResult<Option<Client>> {
        Ok(self
            .clients
            .read()
            .await
            .get(&(tenant_id, client_id.to_owned()))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use audienceos_application::ClientRepository;
    use audienceos_core::TenantId;
    use audienceos_domain::client::{Client, PipelineStage};
    use chrono::Utc;

    use super::InMemoryClientRepository;

    fn client(id: &str, name: &str) -> Client {
        Client::new(id, name, None, None, PipelineStage::Lead, Utc::now())
            .unwrap_or_else(|_| unreachable!())
    }

    #[tokio::test]
    async fn lists_clients_sorted_by_name() {
        let repository = InMemoryClientRepository::new();
        let tenant_id = TenantId::new();

        let saved = repository
            .save_client(tenant_id, client("client-2", "Zenith Labs"))
            .await;
        assert!(saved.is_ok());
        let saved = repository
            .save_client(tenant_id, client("client-1", "Apex Partners"))
            .await;
        assert!(saved.is_ok());

        let listed = repository.list_clients(tenant_id).await.unwrap_or_default();
        let names: Vec<&str> = listed.iter().map(Client::name).collect();
        assert_eq!(names, vec!["Apex Partners", "Zenith Labs"]);
    }

    #[tokio::test]
    async fn list_clients_does_not_leak_across_tenants() {
        let repository = InMemoryClientRepository::new();
        let left_tenant = TenantId::new();
        let right_tenant = TenantId::new();

        let saved = repository
            .save_client(left_tenant, client("client-1", "Apex Partners"))
            .await;
        assert!(saved.is_ok());
        let saved = repository
            .save_client(right_tenant, client("client-2", "Zenith Labs"))
            .await;
        assert!(saved.is_ok());

        let listed = repository
            .list_clients(left_tenant)
            .await
            .unwrap_or_default();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id(), "client-1");

        let found = repository
            .find_client(left_tenant, "client-2")
            .await
            .unwrap_or_default();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn save_overwrites_the_previous_version() {
        let repository = InMemoryClientRepository::new();
        let tenant_id = TenantId::new();

        let saved = repository
            .save_client(tenant_id, client("client-1", "Apex Partners"))
            .await;
        assert!(saved.is_ok());
        let moved = client("client-1", "Apex Partners").with_stage(PipelineStage::Active, Utc::now());
        let saved = repository.save_client(tenant_id, moved).await;
        assert!(saved.is_ok());

        let found = repository
            .find_client(tenant_id, "client-1")
            .await
            .unwrap_or_default();
        assert_eq!(found.map(|c| c.stage()), Some(PipelineStage::Active));
    }
}
