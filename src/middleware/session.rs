use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::{self, SessionClaims, SESSION_COOKIE};
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller identity, injected into request extensions by the
/// session gate and read by downstream handlers and the admin gate.
#[derive(Clone, Debug)]
pub struct SessionContext {
    pub handle: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<SessionClaims> for SessionContext {
    fn from(claims: SessionClaims) -> Self {
        Self {
            handle: claims.sub,
            display_name: claims.name,
            avatar_url: claims.avatar_url,
        }
    }
}

/// Session gate: validates the session cookie and attaches a
/// `SessionContext` for downstream handlers. 401 when absent or invalid.
pub async fn require_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = session_token_from_headers(&headers)
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    let claims = auth::verify_session_token(token, &state.config.security.session_secret)
        .map_err(|e| {
            tracing::debug!("session verification failed: {}", e);
            ApiError::unauthorized("Invalid or expired session")
        })?;

    request.extensions_mut().insert(SessionContext::from(claims));

    Ok(next.run(request).await)
}

fn session_token_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| auth::cookie_value(cookies, SESSION_COOKIE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::COOKIE;

    #[test]
    fn test_token_extracted_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, "devsync_session=tok123; theme=dark".parse().unwrap());
        assert_eq!(session_token_from_headers(&headers), Some("tok123"));
    }

    #[test]
    fn test_no_cookie_header_yields_none() {
        let headers = HeaderMap::new();
        assert_eq!(session_token_from_headers(&headers), None);
    }
}
