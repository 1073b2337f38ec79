use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Accepted-project registry entry. The set of `repo_link` values is the
/// allow-list the scoring engine filters PR events against.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Repo {
    pub id: Uuid,
    pub repo_link: String,
    pub owner_handle: String,
    pub tech_tags: Json<Vec<String>>,
    pub description: String,
    pub submitted_by: String,
    pub submitted_at: DateTime<Utc>,
}
