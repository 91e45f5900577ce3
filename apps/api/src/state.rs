use audienceos_application::{
    AuthorizationService, CartridgeService, ClientService, TicketService, WorkflowService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authorization_service: AuthorizationService,
    pub workflow_service: WorkflowService,
    pub client_service: ClientService,
    pub ticket_service: TicketService,
    pub cartridge_service: CartridgeService,
}
