use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

pub mod github;

pub const SESSION_COOKIE: &str = "devsync_session";

/// Claims carried in the session token. Established once by the OAuth
/// callback; validated by the session gate on every protected request.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Stable GitHub login.
    pub sub: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    pub fn new(
        handle: String,
        name: Option<String>,
        avatar_url: Option<String>,
        expiry_hours: u64,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: handle,
            name,
            avatar_url,
            exp: (now + Duration::hours(expiry_hours as i64)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session secret not configured")]
    MissingSecret,
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

pub fn issue_session_token(claims: &SessionClaims, secret: &str) -> Result<String, SessionError> {
    if secret.is_empty() {
        return Err(SessionError::MissingSecret);
    }
    let key = EncodingKey::from_secret(secret.as_bytes());
    Ok(encode(&Header::default(), claims, &key)?)
}

pub fn verify_session_token(token: &str, secret: &str) -> Result<SessionClaims, SessionError> {
    if secret.is_empty() {
        return Err(SessionError::MissingSecret);
    }
    let key = DecodingKey::from_secret(secret.as_bytes());
    let data = decode::<SessionClaims>(token, &key, &Validation::default())?;
    Ok(data.claims)
}

/// Build the Set-Cookie value that binds the session to the browser.
pub fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, token);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Expire the session cookie immediately.
pub fn clear_session_cookie(secure: bool) -> String {
    let mut cookie = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Pull a cookie value out of a raw Cookie header.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let mut parts = pair.trim().splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some(k), Some(v)) if k == name => Some(v),
            _ => None,
        }
    })
}
