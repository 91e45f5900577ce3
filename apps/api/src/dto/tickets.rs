use std::str::FromStr;

use audienceos_application::CreateTicketInput;
use audienceos_core::AppError;
use audienceos_domain::ticket::{Ticket, TicketPriority};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for ticket creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-ticket-request.ts"
)]
pub struct CreateTicketRequest {
    pub client_id: String,
    pub subject: String,
    pub body: Option<String>,
    pub priority: Option<String>,
}

/// Incoming payload for a ticket status move.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-ticket-status-request.ts"
)]
pub struct UpdateTicketStatusRequest {
    pub status: String,
}

/// API representation of one support ticket.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/ticket-response.ts"
)]
pub struct TicketResponse {
    pub id: String,
    pub client_id: String,
    pub subject: String,
    pub body: Option<String>,
    pub priority: String,
    pub status: String,
    pub created_at: String,
}

impl TryFrom<CreateTicketRequest> for CreateTicketInput {
    type Error = AppError;

    fn try_from(value: CreateTicketRequest) -> Result<Self, Self::Error> {
        let priority = value
            .priority
            .map(|raw| TicketPriority::from_str(raw.as_str()))
            .transpose()?;

        Ok(Self {
            client_id: value.client_id,
            subject: value.subject,
            body: value.body,
            priority,
        })
    }
}

impl From<Ticket> for TicketResponse {
    fn from(value: Ticket) -> Self {
        Self {
            id: value.id().to_owned(),
            client_id: value.client_id().to_owned(),
            subject: value.subject().to_owned(),
            body: value.body().map(ToOwned::to_owned),
            priority: value.priority().as_str().to_owned(),
            status: value.status().as_str().to_owned(),
            created_at: value.created_at().to_rfc3339(),
        }
    }
}
