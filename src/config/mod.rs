use serde::{Deserialize, Serialize};
use std::env;

/// Immutable application configuration. Built once at startup from the
/// process environment and carried through axum state; nothing re-reads
/// env vars per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub github: GithubConfig,
    pub cleanup: CleanupConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Secret expected in the `x-api-key` header on key-tier routes.
    pub api_secret_key: String,
    /// Elevated secret expected in the `x-vpn-key` header.
    pub vpn_api_key: String,
    /// HS256 signing secret for session tokens.
    pub session_secret: String,
    /// GitHub handles allowed through the admin gate.
    pub admin_handles: Vec<String>,
    pub session_expiry_hours: u64,
    /// Set the Secure attribute on the session cookie.
    pub secure_cookies: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
    /// Where the callback redirects the browser after issuing a session.
    pub post_login_redirect: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupConfig {
    pub interval_secs: u64,
    /// How long a closed ticket survives before the sweep removes it.
    pub ticket_retention_days: i64,
}

impl SecurityConfig {
    pub fn is_admin(&self, handle: &str) -> bool {
        self.admin_handles.iter().any(|h| h == handle)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        // Environment-keyed defaults first, then explicit overrides
        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("CORS_ORIGINS") {
            self.server.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECT_TIMEOUT") {
            self.database.connect_timeout_secs = v.parse().unwrap_or(self.database.connect_timeout_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("API_SECRET_KEY") {
            self.security.api_secret_key = v;
        }
        if let Ok(v) = env::var("VPN_API_KEY") {
            self.security.vpn_api_key = v;
        }
        if let Ok(v) = env::var("SESSION_SECRET") {
            self.security.session_secret = v;
        }
        if let Ok(v) = env::var("ADMIN_GITHUB_IDS") {
            self.security.admin_handles = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = env::var("SESSION_EXPIRY_HOURS") {
            self.security.session_expiry_hours = v.parse().unwrap_or(self.security.session_expiry_hours);
        }

        // GitHub OAuth overrides
        if let Ok(v) = env::var("GITHUB_CLIENT_ID") {
            self.github.client_id = v;
        }
        if let Ok(v) = env::var("GITHUB_CLIENT_SECRET") {
            self.github.client_secret = v;
        }
        if let Ok(v) = env::var("GITHUB_CALLBACK_URL") {
            self.github.callback_url = v;
        }
        if let Ok(v) = env::var("POST_LOGIN_REDIRECT") {
            self.github.post_login_redirect = v;
        }

        // Cleanup overrides
        if let Ok(v) = env::var("CLEANUP_INTERVAL_SECS") {
            self.cleanup.interval_secs = v.parse().unwrap_or(self.cleanup.interval_secs);
        }
        if let Ok(v) = env::var("CLEANUP_TICKET_RETENTION_DAYS") {
            self.cleanup.ticket_retention_days = v.parse().unwrap_or(self.cleanup.ticket_retention_days);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 8080,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
            },
            database: DatabaseConfig {
                url: "postgres://localhost:5432/devsync".to_string(),
                max_connections: 10,
                connect_timeout_secs: 30,
            },
            security: SecurityConfig {
                api_secret_key: String::new(),
                vpn_api_key: String::new(),
                session_secret: String::new(),
                admin_handles: Vec::new(),
                session_expiry_hours: 24 * 7, // 1 week
                secure_cookies: false,
            },
            github: GithubConfig {
                client_id: String::new(),
                client_secret: String::new(),
                callback_url: "http://localhost:8080/auth/github/callback".to_string(),
                post_login_redirect: "http://localhost:3000/".to_string(),
            },
            cleanup: CleanupConfig {
                interval_secs: 60 * 60, // hourly
                ticket_retention_days: 7,
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 8080,
                cors_origins: vec!["https://devsync.example.com".to_string()],
            },
            database: DatabaseConfig {
                url: "postgres://localhost:5432/devsync".to_string(),
                max_connections: 50,
                connect_timeout_secs: 5,
            },
            security: SecurityConfig {
                api_secret_key: String::new(),
                vpn_api_key: String::new(),
                session_secret: String::new(),
                admin_handles: Vec::new(),
                session_expiry_hours: 24,
                secure_cookies: true,
            },
            github: GithubConfig {
                client_id: String::new(),
                client_secret: String::new(),
                callback_url: "https://devsync.example.com/auth/github/callback".to_string(),
                post_login_redirect: "https://devsync.example.com/".to_string(),
            },
            cleanup: CleanupConfig {
                interval_secs: 60 * 60,
                ticket_retention_days: 7,
            },
        }
    }
}
