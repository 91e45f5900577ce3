//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_authorization_repository;
mod in_memory_cartridge_repository;
mod in_memory_client_repository;
mod in_memory_ticket_repository;
mod in_memory_workflow_repository;
mod tracing_audit_repository;

pub use in_memory_authorization_repository::InMemoryAuthorizationRepository;
pub use in_memory_cartridge_repository::InMemoryCartridgeRepository;
pub use in_memory_client_repository::InMemoryClientRepository;
pub use in_memory_ticket_repository::InMemoryTicketRepository;
pub use in_memory_workflow_repository::InMemoryWorkflowRepository;
pub use tracing_audit_repository::TracingAuditRepository;
