use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;

use devsync_api::auth::{self, SessionClaims};
use devsync_api::config::AppConfig;
use devsync_api::routes;
use devsync_api::state::AppState;

pub const API_KEY: &str = "test-api-secret-0123456789abcdef";
pub const VPN_KEY: &str = "test-vpn-secret-fedcba9876543210";
pub const SESSION_SECRET: &str = "test-session-secret";
pub const ADMIN_HANDLE: &str = "admin-octocat";

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.api_secret_key = API_KEY.to_string();
    config.security.vpn_api_key = VPN_KEY.to_string();
    config.security.session_secret = SESSION_SECRET.to_string();
    config.security.admin_handles = vec![ADMIN_HANDLE.to_string()];
    config
}

/// Router over a lazy pool: no connection happens until a handler actually
/// queries, so every gate denial is testable without a database.
pub fn test_app() -> Router {
    let config = test_config();
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database.url)
        .expect("valid database url");
    routes::app(AppState::new(Arc::new(config), pool))
}

/// A signed session cookie for the given handle.
pub fn session_cookie_for(handle: &str) -> String {
    let claims = SessionClaims::new(handle.to_string(), None, None, 1);
    let token = auth::issue_session_token(&claims, SESSION_SECRET).expect("session token");
    format!("{}={}", auth::SESSION_COOKIE, token)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn request(method: &str, uri: &str) -> axum::http::request::Builder {
    Request::builder().method(method).uri(uri)
}

pub fn json_body(builder: axum::http::request::Builder, body: serde_json::Value) -> Request<Body> {
    builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}
