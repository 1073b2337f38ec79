use axum::Extension;
use serde::Serialize;

use crate::middleware::{ApiResponse, ApiResult, SessionContext};

#[derive(Debug, Serialize)]
pub struct WhoamiResponse {
    pub handle: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// GET /api/auth/whoami - echo the session identity
pub async fn whoami(Extension(session): Extension<SessionContext>) -> ApiResult<WhoamiResponse> {
    Ok(ApiResponse::success(WhoamiResponse {
        handle: session.handle,
        display_name: session.display_name,
        avatar_url: session.avatar_url,
    }))
}
