use std::collections::HashMap;

use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use url::Url;

use crate::database::models::Repo;
use crate::database::repos::{self, NewRepo};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, SessionContext};
use crate::state::AppState;

const MIN_DESCRIPTION_LEN: usize = 50;

#[derive(Debug, Deserialize)]
pub struct SubmitProjectRequest {
    pub repo_link: String,
    pub description: String,
    #[serde(default)]
    pub tech_tags: Vec<String>,
}

/// POST /api/projects/submit - submit a project into the accepted-repo registry
pub async fn submit(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Json(request): Json<SubmitProjectRequest>,
) -> ApiResult<Repo> {
    // Validation runs before any store access
    let (repo_link, owner_handle) = validate_submission(&request)?;

    let inserted = repos::insert(
        &state.db,
        NewRepo {
            repo_link,
            owner_handle,
            tech_tags: request.tech_tags,
            description: request.description,
            submitted_by: session.handle.clone(),
        },
    )
    .await?;

    match inserted {
        Some(repo) => {
            tracing::info!(handle = %session.handle, repo = %repo.repo_link, "project submitted");
            Ok(ApiResponse::created(repo))
        }
        None => Err(ApiError::conflict("This repository has already been submitted")),
    }
}

/// Check the submission and extract (normalized link, repository owner).
fn validate_submission(request: &SubmitProjectRequest) -> Result<(String, String), ApiError> {
    let mut field_errors = HashMap::new();

    let parsed = parse_github_repo(&request.repo_link);
    if parsed.is_none() {
        field_errors.insert(
            "repo_link".to_string(),
            "Must be a GitHub repository URL (https://github.com/owner/name)".to_string(),
        );
    }

    if request.description.trim().len() < MIN_DESCRIPTION_LEN {
        field_errors.insert(
            "description".to_string(),
            format!("Must be at least {} characters", MIN_DESCRIPTION_LEN),
        );
    }

    if request.tech_tags.iter().all(|t| t.trim().is_empty()) {
        field_errors.insert("tech_tags".to_string(), "At least one tag is required".to_string());
    }

    match parsed {
        Some(ok) if field_errors.is_empty() => Ok(ok),
        _ => Err(ApiError::validation_error("Invalid project submission", Some(field_errors))),
    }
}

/// Accepts only `https://github.com/<owner>/<name>` and returns the
/// normalized link plus the owner segment.
fn parse_github_repo(link: &str) -> Option<(String, String)> {
    let url = Url::parse(link.trim()).ok()?;

    if url.scheme() != "https" || url.host_str() != Some("github.com") {
        return None;
    }

    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
    let [owner, name] = segments.as_slice() else {
        return None;
    };

    let name = name.trim_end_matches(".git");
    if owner.is_empty() || name.is_empty() {
        return None;
    }

    Some((format!("https://github.com/{}/{}", owner, name), owner.to_string()))
}
