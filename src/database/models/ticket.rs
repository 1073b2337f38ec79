use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub id: Uuid,
    pub owner_handle: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    /// Set when the ticket closes; the cleanup sweep removes the row once
    /// this passes.
    pub scheduled_for_deletion: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Ticket lifecycle: open -> in-progress -> closed, forward-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStatus {
    Open,
    InProgress,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in-progress",
            TicketStatus::Closed => "closed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(TicketStatus::Open),
            "in-progress" => Some(TicketStatus::InProgress),
            "closed" => Some(TicketStatus::Closed),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            TicketStatus::Open => 0,
            TicketStatus::InProgress => 1,
            TicketStatus::Closed => 2,
        }
    }

    pub fn can_transition_to(&self, next: TicketStatus) -> bool {
        next.rank() > self.rank()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketPriority {
    Low,
    Medium,
    High,
}

impl TicketPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketPriority::Low => "low",
            TicketPriority::Medium => "medium",
            TicketPriority::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(TicketPriority::Low),
            "medium" => Some(TicketPriority::Medium),
            "high" => Some(TicketPriority::High),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(TicketStatus::Open.can_transition_to(TicketStatus::InProgress));
        assert!(TicketStatus::Open.can_transition_to(TicketStatus::Closed));
        assert!(TicketStatus::InProgress.can_transition_to(TicketStatus::Closed));
    }

    #[test]
    fn test_backward_and_self_transitions_rejected() {
        assert!(!TicketStatus::Closed.can_transition_to(TicketStatus::Open));
        assert!(!TicketStatus::InProgress.can_transition_to(TicketStatus::Open));
        assert!(!TicketStatus::Open.can_transition_to(TicketStatus::Open));
    }

    #[test]
    fn test_status_parse_round_trip() {
        for status in [TicketStatus::Open, TicketStatus::InProgress, TicketStatus::Closed] {
            assert_eq!(TicketStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TicketStatus::parse("reopened"), None);
    }
}
