use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::middleware::session::SessionContext;
use crate::state::AppState;

/// Admin gate. Runs after the session gate and reads its `SessionContext`;
/// a missing context means the caller never authenticated, which is a 401,
/// not a 403. An authenticated non-admin is a 403.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = request
        .extensions()
        .get::<SessionContext>()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    if !state.config.security.is_admin(&session.handle) {
        tracing::warn!(handle = %session.handle, "admin access denied");
        return Err(ApiError::forbidden("Admin access required"));
    }

    Ok(next.run(request).await)
}
