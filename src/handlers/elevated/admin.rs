//! Admin panel routes. All of these sit behind the session gate followed by
//! the admin allow-list gate.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::{Event, User};
use crate::database::{events, repos, tickets, users};
use crate::database::events::NewEvent;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, SessionContext};
use crate::state::AppState;

/// GET /api/admin/users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let all = users::list_all(&state.db).await?;
    Ok(ApiResponse::success(all))
}

/// DELETE /api/admin/projects/:id - remove a registry entry
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    if !repos::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Project not found"));
    }
    tracing::info!(admin = %session.handle, project = %id, "project removed from registry");
    Ok(ApiResponse::success(json!({ "deleted": id })))
}

/// DELETE /api/admin/tickets/:id - immediate removal, bypassing the sweep
pub async fn delete_ticket(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    if !tickets::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Ticket not found"));
    }
    Ok(ApiResponse::success(json!({ "deleted": id })))
}

#[derive(Debug, Deserialize)]
pub struct EventRequest {
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
}

impl EventRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() || self.description.trim().is_empty() {
            return Err(ApiError::validation_error("Title and description are required", None));
        }
        Ok(())
    }
}

/// POST /api/admin/events
pub async fn create_event(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Json(request): Json<EventRequest>,
) -> ApiResult<Event> {
    request.validate()?;

    let event = events::insert(
        &state.db,
        NewEvent {
            title: request.title,
            description: request.description,
            location: request.location,
            starts_at: request.starts_at,
            created_by: session.handle,
        },
    )
    .await?;

    Ok(ApiResponse::created(event))
}

/// PUT /api/admin/events/:id
pub async fn update_event(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<EventRequest>,
) -> ApiResult<Event> {
    request.validate()?;

    let updated = events::update(
        &state.db,
        id,
        NewEvent {
            title: request.title,
            description: request.description,
            location: request.location,
            starts_at: request.starts_at,
            created_by: session.handle,
        },
    )
    .await?;

    updated
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("Event not found"))
}

/// DELETE /api/admin/events/:id
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    if !events::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Event not found"));
    }
    Ok(ApiResponse::success(json!({ "deleted": id })))
}
