//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

/// Lifetime of a signed access token.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 60 * 60;
/// Lifetime of a refresh token, reset on every rotation.
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 7;
/// `iss` claim on access tokens.
pub const TOKEN_ISSUER: &str = "daily-diet-backend";

/// How a presented refresh token is matched against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTokenScope {
    /// Token value and owning user id must both match.
    Scoped,
    /// Token value alone identifies the session.
    Unscoped,
}

impl FromStr for RefreshTokenScope {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scoped" => Ok(Self::Scoped),
            "unscoped" => Ok(Self::Unscoped),
            _ => Err(ConfigError::Invalid("REFRESH_TOKEN_SCOPE", s.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// HS256 secret for access tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    pub refresh_token_scope: RefreshTokenScope,
    /// Create the demo user and meals when the database is empty
    pub seed_demo_data: bool,
}

impl Config {
    /// Config for tests only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            refresh_token_scope: RefreshTokenScope::Unscoped,
            seed_demo_data: false,
        }
    }

    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let refresh_token_scope = match env::var("REFRESH_TOKEN_SCOPE") {
            Ok(raw) => raw.parse()?,
            Err(_) => RefreshTokenScope::Unscoped,
        };

        let seed_demo_data = env::var("SEED_DEMO_DATA")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            jwt_signing_key: env::var("JWT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("JWT_SECRET"))?
                .into_bytes(),
            refresh_token_scope,
            seed_demo_data,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
