use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use audienceos_core::UserIdentity;
use audienceos_domain::client::{MessageChannel, PipelineStage};

use crate::dto::{
    ClientResponse, CreateClientRequest, LogClientMessageRequest, MoveClientStageRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_clients_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<ClientResponse>>> {
    let clients = state
        .client_service
        .list_clients(&user)
        .await?
        .into_iter()
        .map(ClientResponse::from)
        .collect();

    Ok(Json(clients))
}

pub async fn create_client_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateClientRequest>,
) -> ApiResult<(StatusCode, Json<ClientResponse>)> {
    let client = state
        .client_service
        .create_client(&user, payload.try_into()?)
        .await?;

    Ok((StatusCode::CREATED, Json(ClientResponse::from(client))))
}

pub async fn get_client_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(client_id): Path<String>,
) -> ApiResult<Json<ClientResponse>> {
    let client = state
        .client_service
        .get_client(&user, client_id.as_str())
        .await?;

    Ok(Json(ClientResponse::from(client)))
}

pub async fn move_client_stage_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(client_id): Path<String>,
    Json(payload): Json<MoveClientStageRequest>,
) -> ApiResult<Json<ClientResponse>> {
    let stage = PipelineStage::from_str(payload.stage.as_str())?;
    let client = state
        .client_service
        .move_stage(&user, client_id.as_str(), stage)
        .await?;

    Ok(Json(ClientResponse::from(client)))
}

pub async fn log_client_message_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(client_id): Path<String>,
    Json(payload): Json<LogClientMessageRequest>,
) -> ApiResult<Json<ClientResponse>> {
    let channel = MessageChannel::from_str(payload.channel.as_str())?;
    let client = state
        .client_service
        .record_message(&user, client_id.as_str(), channel)
        .await?;

    Ok(Json(ClientResponse::from(client)))
}
