use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::config::DatabaseConfig;

/// Idempotent schema bootstrap, applied at every startup.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        handle TEXT NOT NULL UNIQUE,
        display_name TEXT,
        email TEXT,
        avatar_url TEXT,
        merged_prs JSONB NOT NULL DEFAULT '[]'::jsonb,
        cancelled_prs JSONB NOT NULL DEFAULT '[]'::jsonb,
        points BIGINT NOT NULL DEFAULT 0,
        badges JSONB NOT NULL DEFAULT '["Newcomer"]'::jsonb,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS repos (
        id UUID PRIMARY KEY,
        repo_link TEXT NOT NULL UNIQUE,
        owner_handle TEXT NOT NULL,
        tech_tags JSONB NOT NULL DEFAULT '[]'::jsonb,
        description TEXT NOT NULL,
        submitted_by TEXT NOT NULL,
        submitted_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tickets (
        id UUID PRIMARY KEY,
        owner_handle TEXT NOT NULL,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'open',
        priority TEXT NOT NULL DEFAULT 'medium',
        scheduled_for_deletion TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS events (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        location TEXT,
        starts_at TIMESTAMPTZ NOT NULL,
        created_by TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_users_points ON users (points DESC)",
    "CREATE INDEX IF NOT EXISTS idx_tickets_cleanup ON tickets (scheduled_for_deletion) WHERE status = 'closed'",
];

pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .connect(&config.url)
        .await
}

pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("database schema ready");
    Ok(())
}

pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
