use std::str::FromStr;

use audienceos_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::client::PipelineStage;
use crate::ticket::TicketPriority;
use crate::trigger::{TriggerEvent, WorkflowTrigger};

/// Channel a workflow notification is delivered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationChannel {
    /// Post into the connected Slack workspace.
    Slack,
    /// Send through the workspace mailbox.
    Email,
}

impl NotificationChannel {
    /// Returns the canonical identifier used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Slack => "slack",
            Self::Email => "email",
        }
    }
}

impl FromStr for NotificationChannel {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "slack" => Ok(Self::Slack),
            "email" => Ok(Self::Email),
            other => Err(AppError::Validation(format!(
                "unknown notification channel '{other}'"
            ))),
        }
    }
}

/// One step a workflow performs when its trigger fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkflowAction {
    /// Deliver a message to the team.
    SendNotification {
        /// Channel the message goes out on.
        channel: NotificationChannel,
        /// Message body, with no templating applied.
        message: String,
    },
    /// Open a support ticket for the client the event belongs to.
    CreateTicket {
        /// Subject of the new ticket.
        subject: String,
        /// Priority the ticket is opened at.
        priority: TicketPriority,
    },
    /// Move the client the event belongs to into a pipeline stage.
    MoveClientToStage {
        /// Stage the client is moved into.
        stage: PipelineStage,
    },
}

impl WorkflowAction {
    /// Returns the canonical identifier of the action kind.
    #[must_use]
    pub const fn action_type(&self) -> &'static str {
        match self {
            Self::SendNotification { .. } => "send_notification",
            Self::CreateTicket { .. } => "create_ticket",
            Self::MoveClientToStage { .. } => "move_client_to_stage",
        }
    }
}

/// Checks a single action for completeness.
pub fn validate_action(action: &WorkflowAction) -> AppResult<()> {
    match action {
        WorkflowAction::SendNotification { message, .. } => {
            if message.trim().is_empty() {
                return Err(AppError::Validation(
                    "notification action requires a message".to_owned(),
                ));
            }
        }
        WorkflowAction::CreateTicket { subject, .. } => {
            if subject.trim().is_empty() {
                return Err(AppError::Validation(
                    "ticket action requires a subject".to_owned(),
                ));
            }
        }
        WorkflowAction::MoveClientToStage { .. } => {}
    }
    Ok(())
}

/// Checks an action list for completeness.
///
/// A workflow with no actions would fire without doing anything, so empty
/// lists are rejected even for drafts.
pub fn validate_actions(actions: &[WorkflowAction]) -> AppResult<()> {
    if actions.is_empty() {
        return Err(AppError::Validation(
            "workflow requires at least one action".to_owned(),
        ));
    }
    for action in actions {
        validate_action(action)?;
    }
    Ok(())
}

/// Raw values used to build a [`WorkflowDefinition`].
#[derive(Debug, Clone)]
pub struct WorkflowDefinitionInput {
    /// Unique identifier of the workflow.
    pub id: String,
    /// Human readable workflow name.
    pub name: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Trigger that starts the workflow.
    pub trigger: WorkflowTrigger,
    /// Actions performed when the trigger fires.
    pub actions: Vec<WorkflowAction>,
    /// Whether the workflow participates in dispatch.
    pub is_enabled: bool,
}

/// An automation recipe: one trigger and the actions it runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    id: String,
    name: NonEmptyString,
    description: Option<String>,
    trigger: WorkflowTrigger,
    actions: Vec<WorkflowAction>,
    is_enabled: bool,
}

impl WorkflowDefinition {
    /// Creates a workflow definition from raw input.
    ///
    /// The name must be non-empty, the trigger configuration complete per
    /// the registry, and the action list complete. Trigger problems are
    /// joined into a single validation error so the builder can show them
    /// together.
    pub fn new(input: WorkflowDefinitionInput) -> AppResult<Self> {
        let name = NonEmptyString::new(&input.name)?;
        let outcome = input.trigger.config().validate();
        if !outcome.valid {
            return Err(AppError::Validation(outcome.errors.join("; ")));
        }
        validate_actions(&input.actions)?;
        Ok(Self {
            id: input.id,
            name,
            description: input
                .description
                .filter(|text| !text.trim().is_empty()),
            trigger: input.trigger,
            actions: input.actions,
            is_enabled: input.is_enabled,
        })
    }

    /// Returns the unique identifier of the workflow.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the workflow name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the longer description, when one was given.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the trigger that starts this workflow.
    #[must_use]
    pub fn trigger(&self) -> &WorkflowTrigger {
        &self.trigger
    }

    /// Returns the actions performed when the trigger fires.
    #[must_use]
    pub fn actions(&self) -> &[WorkflowAction] {
        &self.actions
    }

    /// Returns whether the workflow participates in dispatch.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    /// Returns whether an event starts this workflow.
    ///
    /// Disabled workflows never fire, whatever their trigger says.
    #[must_use]
    pub fn fires_on(&self, event: &TriggerEvent) -> bool {
        self.is_enabled && self.trigger.fires_on(event)
    }
}
