use std::collections::HashSet;

use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::database::models::Repo;

pub struct NewRepo {
    pub repo_link: String,
    pub owner_handle: String,
    pub tech_tags: Vec<String>,
    pub description: String,
    pub submitted_by: String,
}

/// Insert a submission into the registry. Returns `None` when the link is
/// already registered.
pub async fn insert(pool: &PgPool, repo: NewRepo) -> Result<Option<Repo>, sqlx::Error> {
    sqlx::query_as::<_, Repo>(
        r#"
        INSERT INTO repos (id, repo_link, owner_handle, tech_tags, description, submitted_by)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (repo_link) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&repo.repo_link)
    .bind(&repo.owner_handle)
    .bind(Json(&repo.tech_tags))
    .bind(&repo.description)
    .bind(&repo.submitted_by)
    .fetch_optional(pool)
    .await
}

pub async fn list(pool: &PgPool) -> Result<Vec<Repo>, sqlx::Error> {
    sqlx::query_as::<_, Repo>("SELECT * FROM repos ORDER BY submitted_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM repos WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// The scoring allow-list: every registered repository link.
pub async fn registry_links(pool: &PgPool) -> Result<HashSet<String>, sqlx::Error> {
    let rows = sqlx::query("SELECT repo_link FROM repos").fetch_all(pool).await?;
    Ok(rows.into_iter().map(|row| row.get("repo_link")).collect())
}
