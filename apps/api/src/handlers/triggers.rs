use std::str::FromStr;

use axum::Json;
use axum::extract::{Query, State};
use audienceos_domain::schedule::{AVAILABLE_TIMEZONES, COMMON_SCHEDULES};
use audienceos_domain::trigger::{TriggerCategory, trigger_types, trigger_types_by_category};

use crate::dto::{
    SchedulePresetResponse, TriggerTypeResponse, TriggerValidationResponse, ValidateTriggerRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct TriggerTypesQueryRequest {
    pub category: Option<String>,
}

pub async fn list_trigger_types_handler(
    Query(query): Query<TriggerTypesQueryRequest>,
) -> ApiResult<Json<Vec<TriggerTypeResponse>>> {
    let types = match query.category.as_deref() {
        Some(raw) => {
            let category = TriggerCategory::from_str(raw)?;
            trigger_types_by_category(category)
                .into_iter()
                .map(TriggerTypeResponse::from)
                .collect()
        }
        None => trigger_types()
            .iter()
            .map(TriggerTypeResponse::from)
            .collect(),
    };

    Ok(Json(types))
}

pub async fn list_schedules_handler() -> Json<Vec<SchedulePresetResponse>> {
    Json(
        COMMON_SCHEDULES
            .iter()
            .map(SchedulePresetResponse::from)
            .collect(),
    )
}

pub async fn list_timezones_handler() -> Json<Vec<&'static str>> {
    Json(AVAILABLE_TIMEZONES.to_vec())
}

pub async fn validate_trigger_handler(
    State(state): State<AppState>,
    Json(payload): Json<ValidateTriggerRequest>,
) -> Json<TriggerValidationResponse> {
    let outcome = state
        .workflow_service
        .validate_trigger(payload.trigger_type.as_str(), &payload.config);

    Json(TriggerValidationResponse::from(outcome))
}
