//! End-to-end flows against a real database. These tests skip unless
//! DEVSYNC_TEST_DATABASE_URL points at a PostgreSQL instance the suite may
//! write to.

mod common;

use std::sync::Arc;

use axum::http::{header, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use devsync_api::database::models::{TicketPriority, TicketStatus};
use devsync_api::database::tickets::{self, NewTicket, StatusUpdate};
use devsync_api::database::{manager, users};
use devsync_api::routes;
use devsync_api::state::AppState;

async fn test_state() -> Option<AppState> {
    let url = std::env::var("DEVSYNC_TEST_DATABASE_URL").ok()?;
    let mut config = common::test_config();
    config.database.url = url;

    let pool = manager::connect(&config.database).await.expect("database connection");
    manager::init_schema(&pool).await.expect("schema init");
    Some(AppState::new(Arc::new(config), pool))
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

#[tokio::test]
async fn submitted_project_is_persisted_with_its_link() {
    let Some(state) = test_state().await else { return };
    let app = routes::app(state);

    let repo_name = unique("dotsync");
    let repo_link = format!("https://github.com/octocat/{}", repo_name);

    let request = common::json_body(
        common::request("POST", "/api/projects/submit")
            .header(header::COOKIE, common::session_cookie_for("octocat")),
        json!({
            "repo_link": repo_link,
            "description": "A command line tool that synchronizes dotfiles across machines using git remotes.",
            "tech_tags": ["rust", "cli"]
        }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = common::body_json(response).await;
    assert_eq!(body["data"]["repo_link"], json!(repo_link.clone()));

    // Resubmitting the same link conflicts
    let request = common::json_body(
        common::request("POST", "/api/projects/submit")
            .header(header::COOKIE, common::session_cookie_for("octocat")),
        json!({
            "repo_link": repo_link,
            "description": "A command line tool that synchronizes dotfiles across machines using git remotes.",
            "tech_tags": ["rust"]
        }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // And it shows up in the public registry listing
    let response = app.oneshot(common::get("/api/projects")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    let links: Vec<&str> =
        body["data"].as_array().unwrap().iter().filter_map(|r| r["repo_link"].as_str()).collect();
    assert!(links.contains(&repo_link.as_str()));
}

#[tokio::test]
async fn merged_pr_against_registered_repo_earns_points() {
    let Some(state) = test_state().await else { return };
    let app = routes::app(state.clone());

    let handle = unique("contributor");
    users::upsert_identity(&state.db, &handle, Some("Test User"), None, None)
        .await
        .expect("user upsert");

    let repo_link = format!("https://github.com/octocat/{}", unique("scored"));
    let request = common::json_body(
        common::request("POST", "/api/projects/submit")
            .header(header::COOKIE, common::session_cookie_for(&handle)),
        json!({
            "repo_link": repo_link,
            "description": "A library of reusable data structures with a focus on cache friendly layouts.",
            "tech_tags": ["rust"]
        }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Merged PR against the registered repo: +10 and First Contribution
    let request = common::json_body(
        common::request("POST", "/api/internal/pr-status").header("x-api-key", common::API_KEY),
        json!({ "handle": handle, "repo": repo_link, "number": 1, "title": "Add feature", "status": "merged" }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["data"]["points"], json!(10));
    assert!(body["data"]["badges"]
        .as_array()
        .unwrap()
        .iter()
        .any(|b| b == "First Contribution"));

    // Merged PR against an unregistered repo: no change
    let request = common::json_body(
        common::request("POST", "/api/internal/pr-status").header("x-api-key", common::API_KEY),
        json!({ "handle": handle, "repo": "https://github.com/evil/self-farm", "number": 2, "title": "Farm", "status": "merged" }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["data"]["points"], json!(10));

    // Cancelled PR against the registered repo: -2
    let request = common::json_body(
        common::request("POST", "/api/internal/pr-status").header("x-api-key", common::API_KEY),
        json!({ "handle": handle, "repo": repo_link, "number": 3, "title": "Oops", "status": "cancelled" }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    let body = common::body_json(response).await;
    assert_eq!(body["data"]["points"], json!(8));

    // Unknown contributor is a 404
    let request = common::json_body(
        common::request("POST", "/api/internal/pr-status").header("x-api-key", common::API_KEY),
        json!({ "handle": unique("ghost"), "repo": repo_link, "number": 4, "title": "x", "status": "merged" }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cleanup_removes_only_expired_closed_tickets() {
    let Some(state) = test_state().await else { return };

    let owner = unique("ticket-owner");
    let new_ticket = |title: &str| NewTicket {
        owner_handle: owner.clone(),
        title: title.to_string(),
        description: "Something is broken".to_string(),
        priority: TicketPriority::Medium,
    };

    // Closed with the schedule already past: swept
    let expired = tickets::insert(&state.db, new_ticket("expired")).await.unwrap();
    let outcome =
        tickets::update_status(&state.db, expired.id, &owner, TicketStatus::Closed, -1).await.unwrap();
    assert!(matches!(outcome, StatusUpdate::Updated(_)));

    // Closed with the schedule in the future: retained
    let recent = tickets::insert(&state.db, new_ticket("recent")).await.unwrap();
    let outcome =
        tickets::update_status(&state.db, recent.id, &owner, TicketStatus::Closed, 7).await.unwrap();
    assert!(matches!(outcome, StatusUpdate::Updated(_)));

    // Open ticket with a past deletion date: the status gate retains it
    let open = tickets::insert(&state.db, new_ticket("open")).await.unwrap();
    sqlx::query("UPDATE tickets SET scheduled_for_deletion = now() - interval '1 day' WHERE id = $1")
        .bind(open.id)
        .execute(&state.db)
        .await
        .unwrap();

    tickets::purge_expired(&state.db).await.unwrap();

    let remaining = tickets::list_for_owner(&state.db, &owner).await.unwrap();
    let titles: Vec<&str> = remaining.iter().map(|t| t.title.as_str()).collect();
    assert!(!titles.contains(&"expired"));
    assert!(titles.contains(&"recent"));
    assert!(titles.contains(&"open"));

    // Idempotent: a second pass with nothing qualifying is a no-op
    tickets::purge_expired(&state.db).await.unwrap();
    let after = tickets::list_for_owner(&state.db, &owner).await.unwrap();
    assert_eq!(after.len(), remaining.len());
}

#[tokio::test]
async fn ticket_status_cannot_move_backwards() {
    let Some(state) = test_state().await else { return };

    let owner = unique("ticket-owner");
    let ticket = tickets::insert(
        &state.db,
        NewTicket {
            owner_handle: owner.clone(),
            title: "Regression".to_string(),
            description: "Steps to reproduce".to_string(),
            priority: TicketPriority::High,
        },
    )
    .await
    .unwrap();

    let outcome =
        tickets::update_status(&state.db, ticket.id, &owner, TicketStatus::InProgress, 7).await.unwrap();
    assert!(matches!(outcome, StatusUpdate::Updated(_)));

    let outcome =
        tickets::update_status(&state.db, ticket.id, &owner, TicketStatus::Open, 7).await.unwrap();
    assert!(matches!(outcome, StatusUpdate::InvalidTransition { .. }));

    // Another user cannot touch it
    let outcome =
        tickets::update_status(&state.db, ticket.id, "someone-else", TicketStatus::Closed, 7)
            .await
            .unwrap();
    assert!(matches!(outcome, StatusUpdate::NotFound));
}
