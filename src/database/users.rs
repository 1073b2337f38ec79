use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{LeaderboardEntry, User};
use crate::database::repos;
use crate::scoring::{self, PrRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrStatus {
    Merged,
    Cancelled,
}

impl PrStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "merged" => Some(PrStatus::Merged),
            "cancelled" => Some(PrStatus::Cancelled),
            _ => None,
        }
    }
}

/// Create or refresh a user row from the identity provider's payload.
/// Scoring fields are left alone; only profile data is updated.
pub async fn upsert_identity(
    pool: &PgPool,
    handle: &str,
    display_name: Option<&str>,
    email: Option<&str>,
    avatar_url: Option<&str>,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, handle, display_name, email, avatar_url)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (handle) DO UPDATE SET
            display_name = EXCLUDED.display_name,
            email = COALESCE(EXCLUDED.email, users.email),
            avatar_url = EXCLUDED.avatar_url,
            updated_at = now()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(handle)
    .bind(display_name)
    .bind(email)
    .bind(avatar_url)
    .fetch_one(pool)
    .await
}

pub async fn find_by_handle(pool: &PgPool, handle: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE handle = $1")
        .bind(handle)
        .fetch_optional(pool)
        .await
}

pub async fn leaderboard(pool: &PgPool, limit: i64) -> Result<Vec<LeaderboardEntry>, sqlx::Error> {
    sqlx::query_as::<_, LeaderboardEntry>(
        r#"
        SELECT handle, display_name, avatar_url, points, badges
        FROM users
        ORDER BY points DESC, handle ASC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY handle ASC")
        .fetch_all(pool)
        .await
}

/// Append a PR record to the user's history and rerun the scoring engine.
///
/// Recomputation is degraded-mode on registry failure: the appended record
/// still persists and the previously cached `points`/`badges` are kept, so
/// a later successful recompute self-heals. Returns `None` for an unknown
/// handle.
pub async fn apply_pr_status(
    pool: &PgPool,
    handle: &str,
    status: PrStatus,
    record: PrRecord,
) -> Result<Option<User>, sqlx::Error> {
    let Some(mut user) = find_by_handle(pool, handle).await? else {
        return Ok(None);
    };

    match status {
        PrStatus::Merged => user.merged_prs.0.push(record),
        PrStatus::Cancelled => user.cancelled_prs.0.push(record),
    }

    match repos::registry_links(pool).await {
        Ok(registry) => {
            let (points, badges) =
                scoring::recompute(&user.merged_prs.0, &user.cancelled_prs.0, &registry);
            user.points = points;
            user.badges = Json(badges);
        }
        Err(e) => {
            tracing::error!(
                handle,
                "registry lookup failed during recompute, keeping cached points: {}",
                e
            );
        }
    }

    // History and cache go out in one statement so a torn write cannot
    // split them; concurrent updates to the same user are last-write-wins.
    sqlx::query(
        r#"
        UPDATE users
        SET merged_prs = $2, cancelled_prs = $3, points = $4, badges = $5, updated_at = now()
        WHERE handle = $1
        "#,
    )
    .bind(handle)
    .bind(&user.merged_prs)
    .bind(&user.cancelled_prs)
    .bind(user.points)
    .bind(&user.badges)
    .execute(pool)
    .await?;

    Ok(Some(user))
}
