//! Transport-secret gates for the two machine tiers: the general api-key
//! tier and the elevated vpn-key tier. Both are independent of any session;
//! a mismatch short-circuits the request with 403 before handler logic runs.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const VPN_KEY_HEADER: &str = "x-vpn-key";

/// Full-token equality. Absence is a mismatch; no prefix matching.
pub fn key_matches(provided: Option<&str>, expected: &str) -> bool {
    match provided {
        Some(value) => !expected.is_empty() && value == expected,
        None => false,
    }
}

pub async fn require_api_key(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    check_key(&headers, API_KEY_HEADER, &state.config.security.api_secret_key, "api")?;
    Ok(next.run(request).await)
}

pub async fn require_vpn_key(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    check_key(&headers, VPN_KEY_HEADER, &state.config.security.vpn_api_key, "vpn")?;
    Ok(next.run(request).await)
}

fn check_key(headers: &HeaderMap, header: &str, expected: &str, tier: &str) -> Result<(), ApiError> {
    let provided = headers.get(header).and_then(|v| v.to_str().ok());

    if key_matches(provided, expected) {
        return Ok(());
    }

    // Missing vs mismatched only matters for the audit trail; the caller
    // sees the same 403 either way.
    match provided {
        None => tracing::warn!(tier, "access key missing"),
        Some(_) => tracing::warn!(tier, "access key mismatch"),
    }

    Err(ApiError::forbidden("Invalid or missing access key"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_allows() {
        assert!(key_matches(Some("a1b2c3"), "a1b2c3"));
    }

    #[test]
    fn test_missing_key_denies() {
        assert!(!key_matches(None, "a1b2c3"));
    }

    #[test]
    fn test_wrong_key_denies() {
        assert!(!key_matches(Some("zzz"), "a1b2c3"));
    }

    #[test]
    fn test_prefix_is_not_a_match() {
        assert!(!key_matches(Some("a1b2"), "a1b2c3"));
        assert!(!key_matches(Some("a1b2c3ff"), "a1b2c3"));
    }

    #[test]
    fn test_unconfigured_secret_denies_everything() {
        assert!(!key_matches(Some(""), ""));
        assert!(!key_matches(None, ""));
    }
}
