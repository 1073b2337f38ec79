//! Thin adapter over the GitHub OAuth web flow. The protocol itself is
//! GitHub's; this module only exchanges the callback code for a token and
//! fetches the authenticated user's profile.

use serde::Deserialize;

use crate::config::GithubConfig;

const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const USER_URL: &str = "https://api.github.com/user";

/// Identity payload returned by GitHub for the authenticated user.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubUser {
    /// Stable identity handle.
    pub login: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    #[error("token exchange rejected: {0}")]
    ExchangeRejected(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub fn authorize_url(config: &GithubConfig) -> String {
    format!(
        "https://github.com/login/oauth/authorize?client_id={}&redirect_uri={}&scope=read:user%20user:email",
        config.client_id, config.callback_url
    )
}

/// Exchange the callback `code` for an access token and load the user profile.
pub async fn exchange_code(config: &GithubConfig, code: &str) -> Result<GithubUser, OAuthError> {
    let client = reqwest::Client::new();

    let token: TokenResponse = client
        .post(TOKEN_URL)
        .header("Accept", "application/json")
        .form(&[
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", config.callback_url.as_str()),
        ])
        .send()
        .await?
        .json()
        .await?;

    let access_token = token.access_token.ok_or_else(|| {
        OAuthError::ExchangeRejected(
            token.error_description.unwrap_or_else(|| "no access token in response".to_string()),
        )
    })?;

    let user: GithubUser = client
        .get(USER_URL)
        .header("Accept", "application/json")
        .header("User-Agent", "devsync-api")
        .bearer_auth(access_token)
        .send()
        .await?
        .json()
        .await?;

    Ok(user)
}
