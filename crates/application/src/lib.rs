//! Application services and ports.

#![forbid(unsafe_code)]

mod audit;
mod authorization_service;
mod cartridge_service;
mod client_service;
mod ticket_service;
mod workflow_service;

pub use audit::{AuditEvent, AuditRepository};
pub use authorization_service::{AuthorizationRepository, AuthorizationService};
pub use cartridge_service::{
    CartridgeRepository, CartridgeService, SaveCartridgeInput, UpdateCartridgeInput,
};
pub use client_service::{ClientRepository, ClientService, CreateClientInput};
pub use ticket_service::{CreateTicketInput, TicketRepository, TicketService};
pub use workflow_service::{
    SaveTriggerInput, SaveWorkflowInput, WorkflowRepository, WorkflowService,
};
