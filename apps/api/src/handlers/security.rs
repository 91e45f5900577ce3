use axum::Json;
use axum::extract::{Extension, State};
use audienceos_core::UserIdentity;

use crate::dto::EffectivePermissionResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<EffectivePermissionResponse>>> {
    let permissions = state
        .authorization_service
        .list_permissions(&user)
        .await?
        .into_iter()
        .map(EffectivePermissionResponse::from)
        .collect();

    Ok(Json(permissions))
}
