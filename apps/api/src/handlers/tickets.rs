use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use audienceos_core::UserIdentity;
use audienceos_domain::ticket::TicketStatus;

use crate::dto::{CreateTicketRequest, TicketResponse, UpdateTicketStatusRequest};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct TicketListQueryRequest {
    pub client_id: Option<String>,
}

pub async fn list_tickets_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<TicketListQueryRequest>,
) -> ApiResult<Json<Vec<TicketResponse>>> {
    let tickets = state
        .ticket_service
        .list_tickets(&user, query.client_id.as_deref())
        .await?
        .into_iter()
        .map(TicketResponse::from)
        .collect();

    Ok(Json(tickets))
}

pub async fn create_ticket_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateTicketRequest>,
) -> ApiResult<(StatusCode, Json<TicketResponse>)> {
    let ticket = state
        .ticket_service
        .create_ticket(&user, payload.try_into()?)
        .await?;

    Ok((StatusCode::CREATED, Json(TicketResponse::from(ticket))))
}

pub async fn update_ticket_status_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(ticket_id): Path<String>,
    Json(payload): Json<UpdateTicketStatusRequest>,
) -> ApiResult<Json<TicketResponse>> {
    let status = TicketStatus::from_str(payload.status.as_str())?;
    let ticket = state
        .ticket_service
        .update_status(&user, ticket_id.as_str(), status)
        .await?;

    Ok(Json(TicketResponse::from(ticket)))
}
