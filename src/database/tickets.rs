use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Ticket, TicketPriority, TicketStatus};

pub struct NewTicket {
    pub owner_handle: String,
    pub title: String,
    pub description: String,
    pub priority: TicketPriority,
}

pub enum StatusUpdate {
    Updated(Ticket),
    NotFound,
    InvalidTransition { from: String },
}

pub async fn insert(pool: &PgPool, ticket: NewTicket) -> Result<Ticket, sqlx::Error> {
    sqlx::query_as::<_, Ticket>(
        r#"
        INSERT INTO tickets (id, owner_handle, title, description, status, priority)
        VALUES ($1, $2, $3, $4, 'open', $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&ticket.owner_handle)
    .bind(&ticket.title)
    .bind(&ticket.description)
    .bind(ticket.priority.as_str())
    .fetch_one(pool)
    .await
}

pub async fn list_for_owner(pool: &PgPool, handle: &str) -> Result<Vec<Ticket>, sqlx::Error> {
    sqlx::query_as::<_, Ticket>(
        "SELECT * FROM tickets WHERE owner_handle = $1 ORDER BY created_at DESC",
    )
    .bind(handle)
    .fetch_all(pool)
    .await
}

/// Owner-scoped, forward-only status transition. Closing stamps the
/// deletion schedule that the cleanup sweep honors.
pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    owner_handle: &str,
    next: TicketStatus,
    retention_days: i64,
) -> Result<StatusUpdate, sqlx::Error> {
    let Some(current) = sqlx::query_as::<_, Ticket>(
        "SELECT * FROM tickets WHERE id = $1 AND owner_handle = $2",
    )
    .bind(id)
    .bind(owner_handle)
    .fetch_optional(pool)
    .await?
    else {
        return Ok(StatusUpdate::NotFound);
    };

    let from = match TicketStatus::parse(&current.status) {
        Some(status) => status,
        None => {
            // A row with an unknown status is unexpected; refuse to move it.
            tracing::error!(ticket = %id, status = %current.status, "ticket has unknown status");
            return Ok(StatusUpdate::InvalidTransition { from: current.status });
        }
    };

    if !from.can_transition_to(next) {
        return Ok(StatusUpdate::InvalidTransition { from: current.status });
    }

    let scheduled_for_deletion = match next {
        TicketStatus::Closed => Some(Utc::now() + Duration::days(retention_days)),
        _ => None,
    };

    let updated = sqlx::query_as::<_, Ticket>(
        r#"
        UPDATE tickets
        SET status = $3, scheduled_for_deletion = $4, updated_at = now()
        WHERE id = $1 AND owner_handle = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(owner_handle)
    .bind(next.as_str())
    .bind(scheduled_for_deletion)
    .fetch_one(pool)
    .await?;

    Ok(StatusUpdate::Updated(updated))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tickets WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// The cleanup sweep: closed tickets whose deletion schedule has passed.
/// Open tickets are retained regardless of the timestamp.
pub async fn purge_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM tickets
        WHERE status = 'closed'
          AND scheduled_for_deletion IS NOT NULL
          AND scheduled_for_deletion <= now()
        "#,
    )
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
