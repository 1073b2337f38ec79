use axum::{
    extract::{Query, State},
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse, Redirect},
};
use serde::Deserialize;

use crate::auth::{self, github, SessionClaims};
use crate::database::users;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /auth/github - hand the browser to the identity provider
pub async fn github_login(State(state): State<AppState>) -> Redirect {
    Redirect::temporary(&github::authorize_url(&state.config.github))
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error_description: Option<String>,
}

/// GET /auth/github/callback - exchange the code, upsert the user, and bind
/// the session cookie. The OAuth protocol itself belongs to the provider;
/// this only adapts its result.
pub async fn github_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let code = query.code.ok_or_else(|| {
        let reason = query.error_description.unwrap_or_else(|| "missing code".to_string());
        tracing::warn!("oauth callback without code: {}", reason);
        ApiError::bad_request("OAuth callback did not include a code")
    })?;

    let identity = github::exchange_code(&state.config.github, &code)
        .await
        .map_err(|e| match e {
            github::OAuthError::ExchangeRejected(reason) => {
                tracing::warn!("oauth exchange rejected: {}", reason);
                ApiError::unauthorized("GitHub rejected the login attempt")
            }
            github::OAuthError::Http(err) => err.into(),
        })?;

    let user = users::upsert_identity(
        &state.db,
        &identity.login,
        identity.name.as_deref(),
        identity.email.as_deref(),
        identity.avatar_url.as_deref(),
    )
    .await?;

    let claims = SessionClaims::new(
        user.handle.clone(),
        user.display_name.clone(),
        user.avatar_url.clone(),
        state.config.security.session_expiry_hours,
    );
    let token = auth::issue_session_token(&claims, &state.config.security.session_secret)
        .map_err(|e| {
            tracing::error!("failed to issue session token: {}", e);
            ApiError::internal_server_error("Failed to establish session")
        })?;

    tracing::info!(handle = %user.handle, "session established");

    let cookie = auth::session_cookie(&token, state.config.security.secure_cookies);
    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Redirect::temporary(&state.config.github.post_login_redirect),
    ))
}

/// POST /auth/logout - expire the session cookie
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = auth::clear_session_cookie(state.config.security.secure_cookies);
    (
        AppendHeaders([(SET_COOKIE, cookie)]),
        axum::Json(serde_json::json!({ "success": true, "data": { "logged_out": true } })),
    )
}
