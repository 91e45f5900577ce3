mod cartridges;
mod clients;
mod common;
mod security;
mod tickets;
mod triggers;
mod workflows;

pub use cartridges::{CartridgeResponse, SaveCartridgeRequest, UpdateCartridgeRequest};
pub use clients::{
    ClientResponse, CreateClientRequest, LogClientMessageRequest, MoveClientStageRequest,
};
pub use common::HealthResponse;
pub use security::EffectivePermissionResponse;
pub use tickets::{CreateTicketRequest, TicketResponse, UpdateTicketStatusRequest};
pub use triggers::{
    SchedulePresetResponse, TriggerTypeResponse, TriggerValidationResponse, ValidateTriggerRequest,
};
pub use workflows::{
    SaveTriggerRequest, SaveWorkflowRequest, WorkflowActionDto, WorkflowResponse,
    WorkflowTriggerResponse,
};
