use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use audienceos_core::UserIdentity;

use crate::dto::{SaveWorkflowRequest, WorkflowResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_workflows_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<WorkflowResponse>>> {
    let workflows = state
        .workflow_service
        .list_workflows(&user)
        .await?
        .into_iter()
        .map(WorkflowResponse::from)
        .collect();

    Ok(Json(workflows))
}

pub async fn create_workflow_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<SaveWorkflowRequest>,
) -> ApiResult<(StatusCode, Json<WorkflowResponse>)> {
    let workflow = state
        .workflow_service
        .create_workflow(&user, payload.try_into()?)
        .await?;

    Ok((StatusCode::CREATED, Json(WorkflowResponse::from(workflow))))
}

pub async fn update_workflow_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(workflow_id): Path<String>,
    Json(payload): Json<SaveWorkflowRequest>,
) -> ApiResult<Json<WorkflowResponse>> {
    let workflow = state
        .workflow_service
        .update_workflow(&user, workflow_id.as_str(), payload.try_into()?)
        .await?;

    Ok(Json(WorkflowResponse::from(workflow)))
}
