//! Router assembly. Each route group carries its access gates as tower
//! layers; gate order is fixed by nesting (outermost runs first) and a
//! denial short-circuits before any handler logic.

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Environment;
use crate::handlers::{elevated, protected, public};
use crate::middleware::{require_admin, require_api_key, require_session, require_vpn_key};
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state);

    Router::new()
        .merge(public_routes())
        .merge(session_routes(&state))
        .merge(api_key_routes(&state))
        .merge(vpn_key_routes(&state))
        .merge(admin_routes(&state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::info::root))
        .route("/health", get(public::info::health))
        .route("/api/leaderboard", get(public::listings::leaderboard))
        .route("/api/projects", get(public::listings::projects))
        .route("/api/events", get(public::listings::events))
        .route("/auth/github", get(public::auth::github_login))
        .route("/auth/github/callback", get(public::auth::github_callback))
        .route("/auth/logout", post(public::auth::logout))
}

fn session_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/auth/whoami", get(protected::auth::whoami))
        .route("/api/projects/submit", post(protected::projects::submit))
        .route(
            "/api/tickets",
            get(protected::tickets::list).post(protected::tickets::create),
        )
        .route("/api/tickets/:id/status", put(protected::tickets::update_status))
        .route_layer(from_fn_with_state(state.clone(), require_session))
}

fn api_key_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/internal/pr-status", post(elevated::internal::pr_status))
        .route_layer(from_fn_with_state(state.clone(), require_api_key))
}

fn vpn_key_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/internal/cleanup", post(elevated::internal::run_cleanup))
        .route("/api/internal/users", get(elevated::internal::users_dump))
        .route_layer(from_fn_with_state(state.clone(), require_vpn_key))
}

fn admin_routes(state: &AppState) -> Router<AppState> {
    // Session gate wraps the admin gate: an unauthenticated caller gets a
    // 401 before the allow-list is ever consulted.
    Router::new()
        .route("/api/admin/users", get(elevated::admin::list_users))
        .route("/api/admin/projects/:id", delete(elevated::admin::delete_project))
        .route("/api/admin/tickets/:id", delete(elevated::admin::delete_ticket))
        .route("/api/admin/events", post(elevated::admin::create_event))
        .route(
            "/api/admin/events/:id",
            put(elevated::admin::update_event).delete(elevated::admin::delete_event),
        )
        .route_layer(from_fn_with_state(state.clone(), require_admin))
        .route_layer(from_fn_with_state(state.clone(), require_session))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    match state.config.environment {
        Environment::Development => CorsLayer::permissive(),
        Environment::Production => {
            let origins: Vec<HeaderValue> = state
                .config
                .server
                .cors_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::HeaderName::from_static("x-api-key"),
                    header::HeaderName::from_static("x-vpn-key"),
                ])
                .allow_credentials(true)
        }
    }
}
