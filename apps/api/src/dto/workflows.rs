use std::str::FromStr;

use audienceos_application::{SaveTriggerInput, SaveWorkflowInput};
use audienceos_core::AppError;
use audienceos_domain::client::PipelineStage;
use audienceos_domain::ticket::TicketPriority;
use audienceos_domain::workflow::{NotificationChannel, WorkflowAction, WorkflowDefinition};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

/// Transport shape of one workflow action.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/workflow-action-dto.ts"
)]
pub enum WorkflowActionDto {
    /// Deliver a message to the team.
    SendNotification { channel: String, message: String },
    /// Open a support ticket for the client the event belongs to.
    CreateTicket { subject: String, priority: String },
    /// Move the client the event belongs to into a pipeline stage.
    MoveClientToStage { stage: String },
}

/// Incoming trigger payload inside a workflow save.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/save-trigger-request.ts"
)]
pub struct SaveTriggerRequest {
    pub id: Option<String>,
    pub name: String,
    pub trigger_type: String,
    #[ts(type = "Record<string, unknown>")]
    pub config: Value,
}

/// Incoming payload for workflow create and update.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/save-workflow-request.ts"
)]
pub struct SaveWorkflowRequest {
    pub name: String,
    pub description: Option<String>,
    pub trigger: SaveTriggerRequest,
    pub actions: Vec<WorkflowActionDto>,
    pub is_enabled: Option<bool>,
}

/// API representation of one workflow trigger.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/workflow-trigger-response.ts"
)]
pub struct WorkflowTriggerResponse {
    pub id: String,
    pub name: String,
    pub trigger_type: String,
    #[ts(type = "Record<string, unknown>")]
    pub config: Value,
}

/// API representation of one workflow definition.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/workflow-response.ts"
)]
pub struct WorkflowResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub trigger: WorkflowTriggerResponse,
    pub actions: Vec<WorkflowActionDto>,
    pub is_enabled: bool,
}

impl TryFrom<WorkflowActionDto> for WorkflowAction {
    type Error = AppError;

    fn try_from(value: WorkflowActionDto) -> Result<Self, Self::Error> {
        Ok(match value {
            WorkflowActionDto::SendNotification { channel, message } => Self::SendNotification {
                channel: NotificationChannel::from_str(channel.as_str())?,
                message,
            },
            WorkflowActionDto::CreateTicket { subject, priority } => Self::CreateTicket {
                subject,
                priority: TicketPriority::from_str(priority.as_str())?,
            },
            WorkflowActionDto::MoveClientToStage { stage } => Self::MoveClientToStage {
                stage: PipelineStage::from_str(stage.as_str())?,
            },
        })
    }
}

impl From<WorkflowAction> for WorkflowActionDto {
    fn from(value: WorkflowAction) -> Self {
        match value {
            WorkflowAction::SendNotification { channel, message } => Self::SendNotification {
                channel: channel.as_str().to_owned(),
                message,
            },
            WorkflowAction::CreateTicket { subject, priority } => Self::CreateTicket {
                subject,
                priority: priority.as_str().to_owned(),
            },
            WorkflowAction::MoveClientToStage { stage } => Self::MoveClientToStage {
                stage: stage.as_str().to_owned(),
            },
        }
    }
}

impl TryFrom<SaveWorkflowRequest> for SaveWorkflowInput {
    type Error = AppError;

    fn try_from(value: SaveWorkflowRequest) -> Result<Self, Self::Error> {
        let actions = value
            .actions
            .into_iter()
            .map(WorkflowAction::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: value.name,
            description: value.description,
            trigger: SaveTriggerInput {
                id: value.trigger.id,
                name: value.trigger.name,
                trigger_type: value.trigger.trigger_type,
                config: value.trigger.config,
            },
            actions,
            is_enabled: value.is_enabled.unwrap_or(true),
        })
    }
}

impl From<WorkflowDefinition> for WorkflowResponse {
    fn from(value: WorkflowDefinition) -> Self {
        let trigger = value.trigger();
        let trigger = WorkflowTriggerResponse {
            id: trigger.id().to_owned(),
            name: trigger.name().to_owned(),
            trigger_type: trigger.trigger_type().as_str().to_owned(),
            config: serde_json::to_value(trigger.config()).unwrap_or(Value::Null),
        };

        Self {
            id: value.id().to_owned(),
            name: value.name().to_owned(),
            description: value.description().map(ToOwned::to_owned),
            trigger,
            actions: value
                .actions()
                .iter()
                .cloned()
                .map(WorkflowActionDto::from)
                .collect(),
            is_enabled: value.is_enabled(),
        }
    }
}
