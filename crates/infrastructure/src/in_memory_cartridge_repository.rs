use std::collections::HashMap;

use async_trait::async_trait;
use audienceos_application::CartridgeRepository;
use audienceos_core::{AppResult, TenantId};
use audienceos_domain::cartridge::Cartridge;
use tokio::sync::RwLock;

/// In-memory cartridge repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryCartridgeRepository {
    cartridges: RwLock<HashMap<(TenantId, String), Cartridge>>,
}

impl InMemoryCartridgeRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cartridges: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl CartridgeRepository for InMemoryCartridgeRepository {
    async fn save_cartridge(&self, tenant_id: TenantId, cartridge: Cartridge) -> AppResult<()> {
        self.cartridges
            .write()
            .await
            .insert((tenant_id, cartridge.id().to_owned()), cartridge);
        Ok(())
    }

    async fn list_cartridges(&self, tenant_id: TenantId) -> AppResult<Vec<Cartridge>> {
        let cartridges = self.cartridges.read().await;
        let mut listed: Vec<Cartridge> = cartridges
            .iter()
            .filter_map(|((stored_tenant_id, _), cartridge)| {
                (stored_tenant_id == &tenant_id).then_some(cartridge.clone())
            })
            .collect();
        listed.sort_by(|left, right| left.name().cmp(right.name()));
        Ok(listed)
    }

    async fn find_cartridge(
        &self,
        tenant_id: TenantId,
        cartridge_id: &str,
    ) -> AppResult<Option<Cartridge>> {
        Ok(self
            .cartridges
            .read()
            .await
            .get(&(tenant_id, cartridge_id.to_owned()))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use audienceos_application::CartridgeRepository;
    use audienceos_core::TenantId;
    use audienceos_domain::cartridge::Cartridge;
    use chrono::Utc;

    use super::InMemoryCartridgeRepository;

    fn cartridge(id: &str, name: &str) -> Cartridge {
        Cartridge::draft(id, None, name, "Keep sentences short.", Utc::now())
            .unwrap_or_else(|_| unreachable!())
    }

    #[tokio::test]
    async fn lists_cartridges_sorted_by_name() {
        let repository = InMemoryCartridgeRepository::new();
        let tenant_id = TenantId::new();

        let saved = repository
            .save_cartridge(tenant_id, cartridge("cartridge-1", "Voice and tone"))
            .await;
        assert!(saved.is_ok());
        let saved = repository
            .save_cartridge(tenant_id, cartridge("cartridge-2", "House style"))
            .await;
        assert!(saved.is_ok());

        let listed = repository
            .list_cartridges(tenant_id)
            .await
            .unwrap_or_default();
        let names: Vec<&str> = listed.iter().map(Cartridge::name).collect();
        assert_eq!(names, vec!["House style", "Voice and tone"]);
    }

    #[tokio::test]
    async fn find_cartridge_does_not_leak_across_tenants() {
        let repository = InMemoryCartridgeRepository::new();
        let left_tenant = TenantId::new();
        let right_tenant = TenantId::new();

        let saved = repository
            .save_cartridge(left_tenant, cartridge("cartridge-1", "Voice and tone"))
            .await;
        assert!(saved.is_ok());

        let found = repository
            .find_cartridge(right_tenant, "cartridge-1")
            .await
            .unwrap_or_default();
        assert!(found.is_none());
    }
}
