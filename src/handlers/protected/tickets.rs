use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Ticket, TicketPriority, TicketStatus};
use crate::database::tickets::{self, NewTicket, StatusUpdate};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, SessionContext};
use crate::state::AppState;

/// GET /api/tickets - the caller's own tickets
pub async fn list(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
) -> ApiResult<Vec<Ticket>> {
    let tickets = tickets::list_for_owner(&state.db, &session.handle).await?;
    Ok(ApiResponse::success(tickets))
}

#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    pub title: String,
    pub description: String,
    pub priority: Option<String>,
}

/// POST /api/tickets
pub async fn create(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Json(request): Json<CreateTicketRequest>,
) -> ApiResult<Ticket> {
    if request.title.trim().is_empty() || request.description.trim().is_empty() {
        return Err(ApiError::validation_error("Title and description are required", None));
    }

    let priority = match request.priority.as_deref() {
        None => TicketPriority::Medium,
        Some(value) => TicketPriority::parse(value)
            .ok_or_else(|| ApiError::bad_request("Priority must be low, medium or high"))?,
    };

    let ticket = tickets::insert(
        &state.db,
        NewTicket {
            owner_handle: session.handle,
            title: request.title,
            description: request.description,
            priority,
        },
    )
    .await?;

    Ok(ApiResponse::created(ticket))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// PUT /api/tickets/:id/status - forward-only lifecycle transition
pub async fn update_status(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> ApiResult<Ticket> {
    let next = TicketStatus::parse(&request.status)
        .ok_or_else(|| ApiError::bad_request("Status must be open, in-progress or closed"))?;

    let outcome = tickets::update_status(
        &state.db,
        id,
        &session.handle,
        next,
        state.config.cleanup.ticket_retention_days,
    )
    .await?;

    match outcome {
        StatusUpdate::Updated(ticket) => Ok(ApiResponse::success(ticket)),
        StatusUpdate::NotFound => Err(ApiError::not_found("Ticket not found")),
        StatusUpdate::InvalidTransition { from } => Err(ApiError::bad_request(format!(
            "Cannot move a {} ticket to {}",
            from,
            next.as_str()
        ))),
    }
}
