//! Contributor scoring and badge assignment.
//!
//! Points and badges are a pure function of a user's full PR history and the
//! accepted-repo registry. They are recomputed from scratch on every
//! PR-status mutation rather than kept as running counters, so a registry
//! change between calls cannot leave stale credit behind.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MERGED_PR_POINTS: i64 = 10;
pub const CANCELLED_PR_PENALTY: i64 = 2;

/// A merged or cancelled pull request, embedded in the user document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrRecord {
    /// Repository identifier, matched against `Repo.repo_link`.
    pub repo: String,
    pub number: i64,
    pub title: String,
    pub occurred_at: DateTime<Utc>,
}

/// Achievement ladder. Thresholds are cumulative, never exclusive: every
/// badge whose threshold is met is granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Badge {
    #[serde(rename = "Newcomer")]
    Newcomer,
    #[serde(rename = "First Contribution")]
    FirstContribution,
    #[serde(rename = "Active Contributor")]
    ActiveContributor,
    #[serde(rename = "Super Contributor")]
    SuperContributor,
    #[serde(rename = "Point Master")]
    PointMaster,
    #[serde(rename = "DevSync Champion")]
    DevsyncChampion,
}

impl Badge {
    pub fn label(&self) -> &'static str {
        match self {
            Badge::Newcomer => "Newcomer",
            Badge::FirstContribution => "First Contribution",
            Badge::ActiveContributor => "Active Contributor",
            Badge::SuperContributor => "Super Contributor",
            Badge::PointMaster => "Point Master",
            Badge::DevsyncChampion => "DevSync Champion",
        }
    }
}

impl std::fmt::Display for Badge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Recompute a user's point total and badge set from their full PR history.
///
/// PRs against repositories not present in the registry contribute nothing,
/// in either direction. This is the anti-gaming filter: merging PRs into
/// your own unsubmitted repositories earns no credit.
pub fn recompute(
    merged: &[PrRecord],
    cancelled: &[PrRecord],
    registry: &HashSet<String>,
) -> (i64, Vec<Badge>) {
    let valid_merged = merged.iter().filter(|pr| registry.contains(&pr.repo)).count() as i64;
    let valid_cancelled = cancelled.iter().filter(|pr| registry.contains(&pr.repo)).count() as i64;

    let points = MERGED_PR_POINTS * valid_merged - CANCELLED_PR_PENALTY * valid_cancelled;
    let badges = badges_for(valid_merged, points);

    (points, badges)
}

fn badges_for(valid_merged: i64, points: i64) -> Vec<Badge> {
    let mut badges = vec![Badge::Newcomer];
    if valid_merged >= 1 {
        badges.push(Badge::FirstContribution);
    }
    if valid_merged >= 5 {
        badges.push(Badge::ActiveContributor);
    }
    if valid_merged >= 10 {
        badges.push(Badge::SuperContributor);
    }
    if points >= 100 {
        badges.push(Badge::PointMaster);
    }
    if points >= 500 {
        badges.push(Badge::DevsyncChampion);
    }
    badges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pr(repo: &str, number: i64) -> PrRecord {
        PrRecord {
            repo: repo.to_string(),
            number,
            title: format!("PR #{}", number),
            occurred_at: Utc::now(),
        }
    }

    fn registry(links: &[&str]) -> HashSet<String> {
        links.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_history_is_newcomer_only() {
        let (points, badges) = recompute(&[], &[], &registry(&["https://github.com/a/b"]));
        assert_eq!(points, 0);
        assert_eq!(badges, vec![Badge::Newcomer]);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let reg = registry(&["https://github.com/a/b"]);
        let merged = vec![pr("https://github.com/a/b", 1), pr("https://github.com/a/b", 2)];
        let cancelled = vec![pr("https://github.com/a/b", 3)];

        let first = recompute(&merged, &cancelled, &reg);
        let second = recompute(&merged, &cancelled, &reg);
        assert_eq!(first, second);
        assert_eq!(first.0, 2 * MERGED_PR_POINTS - CANCELLED_PR_PENALTY);
    }

    #[test]
    fn test_registered_merge_adds_ten_and_keeps_badges() {
        let reg = registry(&["https://github.com/a/b"]);
        let mut merged = vec![pr("https://github.com/a/b", 1)];
        let (before_points, before_badges) = recompute(&merged, &[], &reg);

        merged.push(pr("https://github.com/a/b", 2));
        let (after_points, after_badges) = recompute(&merged, &[], &reg);

        assert_eq!(after_points, before_points + MERGED_PR_POINTS);
        for badge in &before_badges {
            assert!(after_badges.contains(badge), "lost badge {}", badge);
        }
    }

    #[test]
    fn test_unregistered_merge_changes_nothing() {
        let reg = registry(&["https://github.com/a/b"]);
        let mut merged = vec![pr("https://github.com/a/b", 1)];
        let before = recompute(&merged, &[], &reg);

        merged.push(pr("https://github.com/evil/self-farm", 2));
        let after = recompute(&merged, &[], &reg);

        assert_eq!(before, after);
    }

    #[test]
    fn test_cancelled_prs_subtract_two_each() {
        let reg = registry(&["https://github.com/a/b"]);
        let cancelled = vec![pr("https://github.com/a/b", 1), pr("https://github.com/a/b", 2)];
        let (points, _) = recompute(&[], &cancelled, &reg);
        assert_eq!(points, -2 * CANCELLED_PR_PENALTY);
    }

    #[test]
    fn test_badge_ladder_thresholds() {
        let reg = registry(&["https://github.com/a/b"]);

        let five: Vec<_> = (1..=5).map(|n| pr("https://github.com/a/b", n)).collect();
        let (_, badges) = recompute(&five, &[], &reg);
        assert!(badges.contains(&Badge::Newcomer));
        assert!(badges.contains(&Badge::FirstContribution));
        assert!(badges.contains(&Badge::ActiveContributor));
        assert!(!badges.contains(&Badge::SuperContributor));

        let ten: Vec<_> = (1..=10).map(|n| pr("https://github.com/a/b", n)).collect();
        let (points, badges) = recompute(&ten, &[], &reg);
        assert_eq!(points, 100);
        assert!(badges.contains(&Badge::SuperContributor));
        assert!(badges.contains(&Badge::PointMaster));
        assert!(!badges.contains(&Badge::DevsyncChampion));

        let fifty: Vec<_> = (1..=50).map(|n| pr("https://github.com/a/b", n)).collect();
        let (points, badges) = recompute(&fifty, &[], &reg);
        assert_eq!(points, 500);
        assert!(badges.contains(&Badge::DevsyncChampion));
    }

    #[test]
    fn test_badge_labels_round_trip_through_json() {
        let json = serde_json::to_string(&Badge::FirstContribution).unwrap();
        assert_eq!(json, "\"First Contribution\"");
        let back: Badge = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Badge::FirstContribution);
    }
}
