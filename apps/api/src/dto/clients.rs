use std::str::FromStr;

use audienceos_application::CreateClientInput;
use audienceos_core::AppError;
use audienceos_domain::client::{Client, PipelineStage};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for client creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-client-request.ts"
)]
pub struct CreateClientRequest {
    pub name: String,
    pub company: Option<String>,
    pub owner: Option<String>,
    pub stage: Option<String>,
}

/// Incoming payload for a pipeline stage move.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/move-client-stage-request.ts"
)]
pub struct MoveClientStageRequest {
    pub stage: String,
}

/// Incoming payload recording an inbound client message.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/log-client-message-request.ts"
)]
pub struct LogClientMessageRequest {
    pub channel: String,
}

/// API representation of one client account.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/client-response.ts"
)]
pub struct ClientResponse {
    pub id: String,
    pub name: String,
    pub company: Option<String>,
    pub owner: Option<String>,
    pub stage: String,
    pub stage_display_name: String,
    pub last_activity_at: String,
    pub days_inactive: i64,
}

impl TryFrom<CreateClientRequest> for CreateClientInput {
    type Error = AppError;

    fn try_from(value: CreateClientRequest) -> Result<Self, Self::Error> {
        let stage = value
            .stage
            .map(|raw| PipelineStage::from_str(raw.as_str()))
            .transpose()?;

        Ok(Self {
            name: value.name,
            company: value.company,
            owner: value.owner,
            stage,
        })
    }
}

impl From<Client> for ClientResponse {
    fn from(value: Client) -> Self {
        Self {
            id: value.id().to_owned(),
            name: value.name().to_owned(),
            company: value.company().map(ToOwned::to_owned),
            owner: value.owner().map(ToOwned::to_owned),
            stage: value.stage().as_str().to_owned(),
            stage_display_name: value.stage().display_name().to_owned(),
            last_activity_at: value.last_activity_at().to_rfc3339(),
            days_inactive: value.days_inactive(Utc::now()),
        }
    }
}
