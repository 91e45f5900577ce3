use std::collections::HashMap;

use async_trait::async_trait;
use audienceos_application::TicketRepository;
use audienceos_core::{AppResult, TenantId};
use audienceos_domain::ticket::Ticket;
use tokio::sync::RwLock;

/// In-memory ticket repository implementation.
///
/// Tickets list newest first so the dashboard queue reads top-down.
#[derive(Debug, Default)]
pub struct InMemoryTicketRepository {
    tickets: RwLock<HashMap<(TenantId, String), Ticket>>,
}

impl InMemoryTicketRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tickets: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl TicketRepository for InMemoryTicketRepository {
    async fn save_ticket(&self, tenant_id: TenantId, ticket: Ticket) -> AppResult<()> {
        self.tickets
            .write()
            .await
            .insert((tenant_id, ticket.id().to_owned()), ticket);
        Ok(())
    }

    async fn list_tickets(
        &self,
        tenant_id: TenantId,
        client_id: Option<&str>,
    ) -> AppResult<Vec<Ticket>> {
        let tickets = self.tickets.read().await;
        let mut listed: Vec<Ticket> = tickets
            .iter()
            .filter_map(|((stored_tenant_id, _), ticket)| {
                (stored_tenant_id == &tenant_id
                    && client_id.is_none_or(|wanted| ticket.client_id() == wanted))
                .then_some(ticket.clone())
            })
            .collect();
        listed.sort_by(|left, right| {
            right
                .created_at()
                .cmp(&left.created_at())
                .then_with(|| left.id().cmp(right.id()))
        });
        Ok(listed)
    }

    async fn find_ticket(
        &self,
        tenant_id: TenantId,
        ticket_id: &str,
    ) -> AppResult<Option<Ticket>> {
        Ok(self
            .tickets
            .read()
            .await
            .get(&(tenant_id, ticket_id.to_owned()))
            .cloned())
    }
}
