//! Machine-tier routes. `/api/internal/pr-status` sits behind the api-key
//! gate (webhook relay traffic); the cleanup trigger and user dump sit
//! behind the elevated vpn-key gate.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::database::models::User;
use crate::database::tickets;
use crate::database::users::{self, PrStatus};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::scoring::PrRecord;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PrStatusRequest {
    pub handle: String,
    pub repo: String,
    pub number: i64,
    pub title: String,
    /// "merged" or "cancelled"
    pub status: String,
    pub occurred_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct PrStatusResponse {
    pub handle: String,
    pub points: i64,
    pub badges: Value,
}

/// POST /api/internal/pr-status - append a PR event and rerun scoring
pub async fn pr_status(
    State(state): State<AppState>,
    Json(request): Json<PrStatusRequest>,
) -> ApiResult<PrStatusResponse> {
    let status = PrStatus::parse(&request.status)
        .ok_or_else(|| ApiError::bad_request("Status must be merged or cancelled"))?;

    let record = PrRecord {
        repo: request.repo,
        number: request.number,
        title: request.title,
        occurred_at: request.occurred_at.unwrap_or_else(Utc::now),
    };

    let user = users::apply_pr_status(&state.db, &request.handle, status, record)
        .await?
        .ok_or_else(|| ApiError::not_found("Unknown contributor handle"))?;

    tracing::info!(
        handle = %user.handle,
        points = user.points,
        "PR status recorded"
    );

    Ok(ApiResponse::success(PrStatusResponse {
        handle: user.handle,
        points: user.points,
        badges: json!(user.badges),
    }))
}

/// POST /api/internal/cleanup - run one ticket sweep immediately
pub async fn run_cleanup(State(state): State<AppState>) -> ApiResult<Value> {
    let removed = tickets::purge_expired(&state.db).await?;
    tracing::info!(removed, "manual cleanup sweep");
    Ok(ApiResponse::success(json!({ "removed": removed })))
}

/// GET /api/internal/users - full user dump for operations tooling
pub async fn users_dump(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let all = users::list_all(&state.db).await?;
    Ok(ApiResponse::success(all))
}
