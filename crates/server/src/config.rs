//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOP_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `SHOP_BASE_URL` - Public URL of the shop backend
//!
//! ## Optional
//! - `SHOP_HOST` - Bind address (default: 127.0.0.1)
//! - `SHOP_PORT` - Listen port (default: 3000)
//! - `SHOP_DATABASE_MAX_CONNECTIONS` - Pool size (default: 10)
//! - `SHOP_SESSION_EXPIRY_HOURS` - Session inactivity expiry (default: 168, one week)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "3000";
const DEFAULT_MAX_CONNECTIONS: &str = "10";
const DEFAULT_SESSION_EXPIRY_HOURS: &str = "168";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Shop server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// Maximum number of pooled database connections
    pub database_max_connections: u32,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the backend
    pub base_url: Url,
    /// Hours of inactivity after which a session expires
    pub session_expiry_hours: i64,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production", "staging")
    pub sentry_environment: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("SHOP_DATABASE_URL")?;
        let database_max_connections = parse_env(
            "SHOP_DATABASE_MAX_CONNECTIONS",
            &get_env_or_default("SHOP_DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS),
        )?;
        let host = parse_env(
            "SHOP_HOST",
            &get_env_or_default("SHOP_HOST", DEFAULT_HOST),
        )?;
        let port = parse_env(
            "SHOP_PORT",
            &get_env_or_default("SHOP_PORT", DEFAULT_PORT),
        )?;
        let base_url = parse_base_url(&get_required_env("SHOP_BASE_URL")?)?;
        let session_expiry_hours = parse_session_expiry(&get_env_or_default(
            "SHOP_SESSION_EXPIRY_HOURS",
            DEFAULT_SESSION_EXPIRY_HOURS,
        ))?;

        Ok(Self {
            database_url,
            database_max_connections,
            host,
            port,
            base_url,
            session_expiry_hours,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the backend is served over HTTPS (session cookies are marked `Secure`).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.scheme() == "https"
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a raw value, attributing failures to `key`.
fn parse_env<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// The base URL must be absolute http(s).
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar("SHOP_BASE_URL".to_string(), e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEnvVar(
            "SHOP_BASE_URL".to_string(),
            format!("unsupported scheme '{other}'"),
        )),
    }
}

fn parse_session_expiry(raw: &str) -> Result<i64, ConfigError> {
    let hours: i64 = parse_env("SHOP_SESSION_EXPIRY_HOURS", raw)?;
    if hours <= 0 {
        return Err(ConfigError::InvalidEnvVar(
            "SHOP_SESSION_EXPIRY_HOURS".to_string(),
            "must be positive".to_string(),
        ));
    }
    Ok(hours)
}
