use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::Event;

pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub created_by: String,
}

pub async fn insert(pool: &PgPool, event: NewEvent) -> Result<Event, sqlx::Error> {
    sqlx::query_as::<_, Event>(
        r#"
        INSERT INTO events (id, title, description, location, starts_at, created_by)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&event.title)
    .bind(&event.description)
    .bind(&event.location)
    .bind(event.starts_at)
    .bind(&event.created_by)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    event: NewEvent,
) -> Result<Option<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(
        r#"
        UPDATE events
        SET title = $2, description = $3, location = $4, starts_at = $5
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&event.title)
    .bind(&event.description)
    .bind(&event.location)
    .bind(event.starts_at)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn list(pool: &PgPool) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY starts_at ASC")
        .fetch_all(pool)
        .await
}
