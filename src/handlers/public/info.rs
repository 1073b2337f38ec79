use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::manager;
use crate::state::AppState;

/// GET / - service info
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "DevSync API",
            "version": version,
            "description": "Open-source contribution tracking platform",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/auth/github, /auth/github/callback, /auth/logout (public)",
                "leaderboard": "/api/leaderboard (public)",
                "projects": "/api/projects (public), /api/projects/submit (session)",
                "events": "/api/events (public)",
                "tickets": "/api/tickets (session)",
                "internal": "/api/internal/* (key-protected)",
                "admin": "/api/admin/* (admin session)",
            }
        }
    }))
}

/// GET /health - liveness plus store check
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match manager::health_check(&state.db).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "database": "ok" }
            })),
        ),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": { "status": "degraded", "timestamp": now }
                })),
            )
        }
    }
}
