use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use devsync_api::{cleanup, config::AppConfig, database::manager, routes, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, secrets, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Arc::new(AppConfig::from_env());
    tracing::info!("Starting DevSync API in {:?} mode", config.environment);

    let pool = manager::connect(&config.database).await?;
    manager::init_schema(&pool).await?;

    let state = AppState::new(config.clone(), pool);

    // Process-lifetime housekeeping timer; first sweep runs immediately
    cleanup::spawn(state.clone());

    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.server.port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
