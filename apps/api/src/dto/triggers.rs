use audienceos_domain::schedule::SchedulePreset;
use audienceos_domain::trigger::{TriggerMetadata, TriggerValidation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

/// Palette entry for one trigger type.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/trigger-type-response.ts"
)]
pub struct TriggerTypeResponse {
    pub trigger_type: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub icon: String,
}

/// One ready-made schedule offered by the builder.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/schedule-preset-response.ts"
)]
pub struct SchedulePresetResponse {
    pub label: String,
    pub cron: String,
    pub description: String,
}

/// Incoming payload for trigger configuration validation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/validate-trigger-request.ts"
)]
pub struct ValidateTriggerRequest {
    pub trigger_type: String,
    #[ts(type = "Record<string, unknown>")]
    pub config: Value,
}

/// Validation outcome for one trigger configuration.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/trigger-validation-response.ts"
)]
pub struct TriggerValidationResponse {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl From<&TriggerMetadata> for TriggerTypeResponse {
    fn from(value: &TriggerMetadata) -> Self {
        Self {
            trigger_type: value.trigger_type().as_str().to_owned(),
            name: value.name().to_owned(),
            description: value.description().to_owned(),
            category: value.category().as_str().to_owned(),
            icon: value.icon().to_owned(),
        }
    }
}

impl From<&SchedulePreset> for SchedulePresetResponse {
    fn from(value: &SchedulePreset) -> Self {
        Self {
            label: value.label().to_owned(),
            cron: value.cron().to_owned(),
            description: value.description().to_owned(),
        }
    }
}

impl From<TriggerValidation> for TriggerValidationResponse {
    fn from(value: TriggerValidation) -> Self {
        Self {
            valid: value.valid,
            errors: value.errors,
        }
    }
}
