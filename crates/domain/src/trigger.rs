use std::str::FromStr;

use audienceos_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{MessageChannel, PipelineStage};
use crate::ticket::TicketPriority;

/// Identifies one of the trigger kinds the workflow builder can attach to a
/// workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    /// A client moved into a pipeline stage.
    StageChange,
    /// A client has had no recorded activity for a number of days.
    Inactivity,
    /// A tracked metric crossed a configured threshold.
    KpiThreshold,
    /// An inbound message arrived on a connected channel.
    NewMessage,
    /// A support ticket was opened.
    TicketCreated,
    /// A recurring cron schedule came due.
    Scheduled,
}

impl TriggerType {
    /// Returns the canonical identifier used on the wire and in stored
    /// workflow definitions.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StageChange => "stage_change",
            Self::Inactivity => "inactivity",
            Self::KpiThreshold => "kpi_threshold",
            Self::NewMessage => "new_message",
            Self::TicketCreated => "ticket_created",
            Self::Scheduled => "scheduled",
        }
    }

    /// Returns the builder palette category this trigger belongs to.
    #[must_use]
    pub const fn category(self) -> TriggerCategory {
        match self {
            Self::StageChange | Self::NewMessage | Self::TicketCreated => TriggerCategory::Event,
            Self::Inactivity | Self::KpiThreshold => TriggerCategory::Condition,
            Self::Scheduled => TriggerCategory::Schedule,
        }
    }

    /// Returns every trigger type in presentation order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[TriggerType] = &[
            TriggerType::StageChange,
            TriggerType::Inactivity,
            TriggerType::KpiThreshold,
            TriggerType::NewMessage,
            TriggerType::TicketCreated,
            TriggerType::Scheduled,
        ];
        ALL
    }
}

impl FromStr for TriggerType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "stage_change" => Ok(Self::StageChange),
            "inactivity" => Ok(Self::Inactivity),
            "kpi_threshold" => Ok(Self::KpiThreshold),
            "new_message" => Ok(Self::NewMessage),
            "ticket_created" => Ok(Self::TicketCreated),
            "scheduled" => Ok(Self::Scheduled),
            other => Err(AppError::Validation(format!("unknown trigger type '{other}'"))),
        }
    }
}

/// Groups trigger types into the sections shown by the workflow builder
/// palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerCategory {
    /// Fires in direct response to something happening in the workspace.
    Event,
    /// Fires when an evaluated condition over workspace data becomes true.
    Condition,
    /// Fires on a recurring timetable.
    Schedule,
}

impl TriggerCategory {
    /// Returns the canonical identifier for this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Condition => "condition",
            Self::Schedule => "schedule",
        }
    }
}

impl FromStr for TriggerCategory {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "event" => Ok(Self::Event),
            "condition" => Ok(Self::Condition),
            "schedule" => Ok(Self::Schedule),
            other => Err(AppError::Validation(format!(
                "unknown trigger category '{other}'"
            ))),
        }
    }
}

/// Display metadata for one trigger type, consumed by the builder palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerMetadata {
    trigger_type: TriggerType,
    name: &'static str,
    description: &'static str,
    icon: &'static str,
}

impl TriggerMetadata {
    /// Returns the trigger type this entry describes.
    #[must_use]
    pub const fn trigger_type(&self) -> TriggerType {
        self.trigger_type
    }

    /// Returns the human readable name shown in the palette.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the one line explanation shown under the name.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.description
    }

    /// Returns the icon slug the frontend resolves to an SVG.
    #[must_use]
    pub const fn icon(&self) -> &'static str {
        self.icon
    }

    /// Returns the palette category, derived from the trigger type.
    #[must_use]
    pub const fn category(&self) -> TriggerCategory {
        self.trigger_type.category()
    }
}

const REGISTRY: &[TriggerMetadata] = &[
    TriggerMetadata {
        trigger_type: TriggerType::StageChange,
        name: "Stage Changed",
        description: "Fires when a client moves into a pipeline stage",
        icon: "arrow-right-circle",
    },
    TriggerMetadata {
        trigger_type: TriggerType::Inactivity,
        name: "Client Inactive",
        description: "Fires when a client has had no activity for a number of days",
        icon: "clock",
    },
    TriggerMetadata {
        trigger_type: TriggerType::KpiThreshold,
        name: "KPI Threshold",
        description: "Fires when a tracked metric crosses a configured threshold",
        icon: "trending-up",
    },
    TriggerMetadata {
        trigger_type: TriggerType::NewMessage,
        name: "New Message",
        description: "Fires when an inbound message arrives on a connected channel",
        icon: "message-circle",
    },
    TriggerMetadata {
        trigger_type: TriggerType::TicketCreated,
        name: "Ticket Created",
        description: "Fires when a support ticket is opened",
        icon: "life-buoy",
    },
    TriggerMetadata {
        trigger_type: TriggerType::Scheduled,
        name: "Scheduled",
        description: "Fires on a recurring cron schedule",
        icon: "calendar",
    },
];

/// Returns the full trigger palette in presentation order.
#[must_use]
pub fn trigger_types() -> &'static [TriggerMetadata] {
    REGISTRY
}

/// Returns the palette entries belonging to one category, preserving
/// presentation order.
#[must_use]
pub fn trigger_types_by_category(category: TriggerCategory) -> Vec<&'static TriggerMetadata> {
    REGISTRY
        .iter()
        .filter(|entry| entry.category() == category)
        .collect()
}

/// Looks up palette metadata by canonical identifier.
///
/// Returns `None` for identifiers the registry does not know, which callers
/// surface as an unknown trigger type rather than a missing record.
#[must_use]
pub fn trigger_metadata(value: &str) -> Option<&'static TriggerMetadata> {
    REGISTRY
        .iter()
        .find(|entry| entry.trigger_type().as_str() == value)
}

/// Comparison applied by a KPI threshold trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiOperator {
    /// Metric strictly above the threshold.
    GreaterThan,
    /// Metric strictly below the threshold.
    LessThan,
    /// Metric at or above the threshold.
    GreaterOrEqual,
    /// Metric at or below the threshold.
    LessOrEqual,
    /// Metric exactly at the threshold.
    Equal,
}

impl KpiOperator {
    /// Returns the canonical identifier for this operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GreaterThan => "greater_than",
            Self::LessThan => "less_than",
            Self::GreaterOrEqual => "greater_or_equal",
            Self::LessOrEqual => "less_or_equal",
            Self::Equal => "equal",
        }
    }
}

impl FromStr for KpiOperator {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "greater_than" => Ok(Self::GreaterThan),
            "less_than" => Ok(Self::LessThan),
            "greater_or_equal" => Ok(Self::GreaterOrEqual),
            "less_or_equal" => Ok(Self::LessOrEqual),
            "equal" => Ok(Self::Equal),
            other => Err(AppError::Validation(format!("unknown KPI operator '{other}'"))),
        }
    }
}

/// Per-type configuration carried by a workflow trigger.
///
/// Fields are optional because the builder saves partial drafts. Completeness
/// is enforced by [`TriggerConfig::validate`], not by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TriggerConfig {
    /// Configuration for a stage change trigger.
    StageChange {
        /// Only fire when the client leaves this stage.
        from_stage: Option<String>,
        /// Fire when the client enters this stage.
        to_stage: Option<String>,
    },
    /// Configuration for an inactivity trigger.
    Inactivity {
        /// Number of days without activity before the trigger fires.
        days: Option<i64>,
    },
    /// Configuration for a KPI threshold trigger.
    KpiThreshold {
        /// Identifier of the tracked metric.
        metric: Option<String>,
        /// Comparison applied between metric and threshold.
        operator: Option<KpiOperator>,
        /// Threshold the metric is compared against.
        value: Option<f64>,
    },
    /// Configuration for a new message trigger.
    NewMessage {
        /// Only fire for messages on this channel.
        channel: Option<String>,
    },
    /// Configuration for a ticket created trigger.
    TicketCreated {
        /// Only fire for tickets opened at this priority.
        priority: Option<String>,
    },
    /// Configuration for a scheduled trigger.
    Scheduled {
        /// Five field cron expression.
        schedule: Option<String>,
        /// IANA timezone the schedule is evaluated in.
        timezone: Option<String>,
    },
}

impl TriggerConfig {
    /// Returns the trigger type this configuration belongs to.
    #[must_use]
    pub const fn trigger_type(&self) -> TriggerType {
        match self {
            Self::StageChange { .. } => TriggerType::StageChange,
            Self::Inactivity { .. } => TriggerType::Inactivity,
            Self::KpiThreshold { .. } => TriggerType::KpiThreshold,
            Self::NewMessage { .. } => TriggerType::NewMessage,
            Self::TicketCreated { .. } => TriggerType::TicketCreated,
            Self::Scheduled { .. } => TriggerType::Scheduled,
        }
    }

    /// Builds a configuration of the given type from an untyped payload.
    ///
    /// Absent fields and fields of the wrong JSON type both map to `None`, so
    /// a sloppy payload validates to the same errors as an empty one instead
    /// of failing to decode.
    #[must_use]
    pub fn from_payload(trigger_type: TriggerType, payload: &Value) -> Self {
        match trigger_type {
            TriggerType::StageChange => Self::StageChange {
                from_stage: string_field(payload, "from_stage"),
                to_stage: string_field(payload, "to_stage"),
            },
            TriggerType::Inactivity => Self::Inactivity {
                days: payload.get("days").and_then(Value::as_i64),
            },
            TriggerType::KpiThreshold => Self::KpiThreshold {
                metric: string_field(payload, "metric"),
                operator: string_field(payload, "operator")
                    .and_then(|raw| KpiOperator::from_str(&raw).ok()),
                value: payload.get("value").and_then(Value::as_f64),
            },
            TriggerType::NewMessage => Self::NewMessage {
                channel: string_field(payload, "channel"),
            },
            TriggerType::TicketCreated => Self::TicketCreated {
                priority: string_field(payload, "priority"),
            },
            TriggerType::Scheduled => Self::Scheduled {
                schedule: string_field(payload, "schedule"),
                timezone: string_field(payload, "timezone"),
            },
        }
    }

    /// Checks the configuration for completeness and returns every problem
    /// found, not just the first.
    #[must_use]
    pub fn validate(&self) -> TriggerValidation {
        let mut errors = Vec::new();
        match self {
            Self::StageChange { to_stage, .. } => {
                if !has_text(to_stage) {
                    errors.push("Stage change trigger requires a target stage".to_owned());
                }
            }
            Self::Inactivity { days } => {
                if !days.map(|value| value >= 1).unwrap_or(false) {
                    errors.push("Inactivity trigger requires days >= 1".to_owned());
                }
            }
            Self::KpiThreshold {
                metric,
                operator,
                value,
            } => {
                if !has_text(metric) {
                    errors.push("KPI threshold trigger requires a metric".to_owned());
                }
                if operator.is_none() {
                    errors.push("KPI threshold trigger requires an operator".to_owned());
                }
                if value.is_none() {
                    errors.push("KPI threshold trigger requires a value".to_owned());
                }
            }
            Self::NewMessage { .. } | Self::TicketCreated { .. } => {}
            Self::Scheduled { schedule, timezone } => {
                if !has_text(schedule) {
                    errors.push("Scheduled trigger requires a cron schedule".to_owned());
                }
                if !has_text(timezone) {
                    errors.push("Scheduled trigger requires a timezone".to_owned());
                }
            }
        }
        TriggerValidation::from_errors(errors)
    }

    /// Returns whether this configuration matches a runtime event.
    ///
    /// Optional filter fields that are unset match every event of the right
    /// kind. Condition and schedule configurations never match runtime events
    /// because they are evaluated by sweeps, not dispatch.
    #[must_use]
    pub fn fires_on(&self, event: &TriggerEvent) -> bool {
        match (self, event) {
            (
                Self::StageChange {
                    from_stage,
                    to_stage,
                },
                TriggerEvent::StageChanged {
                    from_stage: event_from,
                    to_stage: event_to,
                    ..
                },
            ) => {
                to_stage.as_deref() == Some(event_to.as_str())
                    && from_stage
                        .as_deref()
                        .map(|wanted| wanted == event_from.as_str())
                        .unwrap_or(true)
            }
            (Self::NewMessage { channel }, TriggerEvent::MessageReceived { channel: on, .. }) => {
                channel
                    .as_deref()
                    .map(|wanted| wanted == on.as_str())
                    .unwrap_or(true)
            }
            (
                Self::TicketCreated { priority },
                TriggerEvent::TicketOpened {
                    priority: opened_at,
                    ..
                },
            ) => priority
                .as_deref()
                .map(|wanted| wanted == opened_at.as_str())
                .unwrap_or(true),
            _ => false,
        }
    }
}

fn string_field(payload: &Value, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
}

fn has_text(field: &Option<String>) -> bool {
    field
        .as_deref()
        .map(|value| !value.trim().is_empty())
        .unwrap_or(false)
}

/// Trigger attached to a workflow definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowTrigger {
    id: String,
    name: String,
    config: TriggerConfig,
}

impl WorkflowTrigger {
    /// Creates a trigger as saved by the builder.
    ///
    /// The configuration is not validated here so that partial drafts can be
    /// stored; callers run [`validate_trigger_config`] before enabling a
    /// workflow.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, config: TriggerConfig) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            config,
        }
    }

    /// Returns the builder assigned identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the label the builder shows for this trigger.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the per-type configuration.
    #[must_use]
    pub fn config(&self) -> &TriggerConfig {
        &self.config
    }

    /// Returns the trigger type of the attached configuration.
    #[must_use]
    pub const fn trigger_type(&self) -> TriggerType {
        self.config.trigger_type()
    }

    /// Returns whether this trigger matches a runtime event.
    #[must_use]
    pub fn fires_on(&self, event: &TriggerEvent) -> bool {
        self.config.fires_on(event)
    }
}

/// Outcome of validating a trigger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerValidation {
    /// Whether the configuration is complete enough to run.
    pub valid: bool,
    /// Every problem found, in field order.
    pub errors: Vec<String>,
}

impl TriggerValidation {
    /// Builds an outcome from collected errors, deriving the flag from
    /// whether any were found.
    #[must_use]
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validates the configuration attached to a saved trigger.
#[must_use]
pub fn validate_trigger_config(trigger: &WorkflowTrigger) -> TriggerValidation {
    trigger.config().validate()
}

/// Validates an untyped trigger payload as submitted by the builder.
///
/// An unrecognized type identifier is reported as a validation error instead
/// of a decode failure so the builder can show it inline.
#[must_use]
pub fn validate_trigger_payload(trigger_type: &str, payload: &Value) -> TriggerValidation {
    match TriggerType::from_str(trigger_type) {
        Ok(parsed) => TriggerConfig::from_payload(parsed, payload).validate(),
        Err(_) => TriggerValidation::from_errors(vec![format!(
            "Unknown trigger type: {trigger_type}"
        )]),
    }
}

/// Something that happened in the workspace which event triggers can match.
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerEvent {
    /// A client moved between pipeline stages.
    StageChanged {
        /// Client that moved.
        client_id: String,
        /// Stage the client left.
        from_stage: PipelineStage,
        /// Stage the client entered.
        to_stage: PipelineStage,
    },
    /// An inbound message was recorded for a client.
    MessageReceived {
        /// Client the message belongs to.
        client_id: String,
        /// Channel the message arrived on.
        channel: MessageChannel,
    },
    /// A support ticket was opened.
    TicketOpened {
        /// Ticket that was opened.
        ticket_id: String,
        /// Client the ticket belongs to.
        client_id: String,
        /// Priority the ticket was opened at.
        priority: TicketPriority,
    },
}

impl TriggerEvent {
    /// Returns the stable kind identifier of this event.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::StageChanged { .. } => "stage_changed",
            Self::MessageReceived { .. } => "message_received",
            Self::TicketOpened { .. } => "ticket_opened",
        }
    }

    /// Returns the client the event belongs to.
    #[must_use]
    pub fn client_id(&self) -> &str {
        match self {
            Self::StageChanged { client_id, .. }
            | Self::MessageReceived { client_id, .. }
            | Self::TicketOpened { client_id, .. } => client_id,
        }
    }
}
