use axum::extract::{Query, State};
use serde::Deserialize;

use crate::database::models::{Event, LeaderboardEntry, Repo};
use crate::database::{events, repos, users};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

const DEFAULT_LEADERBOARD_LIMIT: i64 = 50;
const MAX_LEADERBOARD_LIMIT: i64 = 200;

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<i64>,
}

/// GET /api/leaderboard - contributors ordered by points
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> ApiResult<Vec<LeaderboardEntry>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
        .clamp(1, MAX_LEADERBOARD_LIMIT);

    let entries = users::leaderboard(&state.db, limit).await?;
    Ok(ApiResponse::success(entries))
}

/// GET /api/projects - the accepted-repo registry
pub async fn projects(State(state): State<AppState>) -> ApiResult<Vec<Repo>> {
    let projects = repos::list(&state.db).await?;
    Ok(ApiResponse::success(projects))
}

/// GET /api/events - upcoming events
pub async fn events(State(state): State<AppState>) -> ApiResult<Vec<Event>> {
    let events = events::list(&state.db).await?;
    Ok(ApiResponse::success(events))
}
