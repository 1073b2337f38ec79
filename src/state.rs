use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;

/// Shared application state: the one-time-loaded configuration and the
/// connection pool. Cheap to clone, handed to every gate and handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: PgPool,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, db: PgPool) -> Self {
        Self { config, db }
    }
}
