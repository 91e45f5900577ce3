use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use audienceos_core::UserIdentity;

use crate::dto::{CartridgeResponse, SaveCartridgeRequest, UpdateCartridgeRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_cartridges_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<CartridgeResponse>>> {
    let cartridges = state
        .cartridge_service
        .list_cartridges(&user)
        .await?
        .into_iter()
        .map(CartridgeResponse::from)
        .collect();

    Ok(Json(cartridges))
}

pub async fn create_cartridge_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<SaveCartridgeRequest>,
) -> ApiResult<(StatusCode, Json<CartridgeResponse>)> {
    let cartridge = state
        .cartridge_service
        .save_cartridge(&user, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(CartridgeResponse::from(cartridge))))
}

pub async fn update_cartridge_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(cartridge_id): Path<String>,
    Json(payload): Json<UpdateCartridgeRequest>,
) -> ApiResult<Json<CartridgeResponse>> {
    let cartridge = state
        .cartridge_service
        .update_cartridge(&user, cartridge_id.as_str(), payload.into())
        .await?;

    Ok(Json(CartridgeResponse::from(cartridge)))
}

pub async fn activate_cartridge_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(cartridge_id): Path<String>,
) -> ApiResult<Json<CartridgeResponse>> {
    let cartridge = state
        .cartridge_service
        .activate_cartridge(&user, cartridge_id.as_str())
        .await?;

    Ok(Json(CartridgeResponse::from(cartridge)))
}

pub async fn archive_cartridge_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(cartridge_id): Path<String>,
) -> ApiResult<Json<CartridgeResponse>> {
    let cartridge = state
        .cartridge_service
        .archive_cartridge(&user, cartridge_id.as_str())
        .await?;

    Ok(Json(CartridgeResponse::from(cartridge)))
}
