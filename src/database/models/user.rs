use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::scoring::{Badge, PrRecord};

/// A contributor. The PR histories are embedded documents; `points` and
/// `badges` are denormalized caches owned by the scoring engine, never
/// edited directly.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub handle: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub merged_prs: Json<Vec<PrRecord>>,
    pub cancelled_prs: Json<Vec<PrRecord>>,
    pub points: i64,
    pub badges: Json<Vec<Badge>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public leaderboard projection; no contact details.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LeaderboardEntry {
    pub handle: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub points: i64,
    pub badges: Json<Vec<Badge>>,
}
