//! Domain model for AudienceOS: the client pipeline, support tickets,
//! instruction cartridges, workflow automation and the permission rules
//! guarding them.
//!
//! Everything in this crate is pure. Persistence and transport live in the
//! infrastructure and api crates.

#![forbid(unsafe_code)]

/// Instruction cartridges pinned to clients.
pub mod cartridge;
/// Client accounts and the lifecycle pipeline.
pub mod client;
/// Cron presets and schedule descriptions.
pub mod schedule;
/// Permission grants, checks and audit actions.
pub mod security;
/// Support tickets.
pub mod ticket;
/// The workflow trigger registry and trigger matching.
pub mod trigger;
/// Workflow definitions and their actions.
pub mod workflow;

pub use cartridge::{Cartridge, CartridgeStatus};
pub use client::{Client, MessageChannel, PipelineStage};
pub use schedule::{
    AVAILABLE_TIMEZONES, COMMON_SCHEDULES, SchedulePreset, describe_cron_expression,
};
pub use security::{
    AuditAction, EffectivePermission, PermissionAction, PermissionSource, check_permission,
};
pub use ticket::{Ticket, TicketPriority, TicketStatus};
pub use trigger::{
    KpiOperator, TriggerCategory, TriggerConfig, TriggerEvent, TriggerMetadata, TriggerType,
    TriggerValidation, WorkflowTrigger, trigger_metadata, trigger_types,
    trigger_types_by_category, validate_trigger_config, validate_trigger_payload,
};
pub use workflow::{
    NotificationChannel, WorkflowAction, WorkflowDefinition, WorkflowDefinitionInput,
    validate_action, validate_actions,
};
