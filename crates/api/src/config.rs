//! API configuration.
//!
//! Configuration is loaded from environment variables at startup.
//!
//! # Environment Variables
//!
//! ## Optional (with defaults)
//! - `API_DATABASE_URL` - `PostgreSQL` connection string, or `memory://` for the
//!   in-process store (fallback: `DATABASE_URL`, then a local default)
//! - `API_HOST` - Bind address (default: 127.0.0.1)
//! - `API_PORT` - Listen port (default: 5000)
//! - `API_ADMIN_USERNAME` - Admin login name (default: admin)
//! - `API_ADMIN_PASSWORD_HASH` - Argon2 PHC hash of the admin password
//!   (unset disables `/api/auth/login`)
//! - `API_ADMIN_TOKEN` - Shared bearer secret for automation (unset disables it)
//! - `API_SESSION_TTL_SECONDS` - Lifetime of login tokens (default: 86400)
//! - `API_GENERAL_INQUIRY_ID` - Reserved ID of the sentinel product
//! - `API_CORS_ORIGINS` - Comma-separated allowed origins (unset allows any)
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT` - Error tracking

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use granite_world_core::ProductId;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/granite_world";
const MIN_TOKEN_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "demo-token",
    "xxx",
    "todo",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub database_url: SecretString,
    pub host: IpAddr,
    pub port: u16,
    pub admin: AdminAuthConfig,
    pub general_inquiry_id: ProductId,
    /// Allowed CORS origins. Empty allows any origin.
    pub cors_origins: Vec<String>,
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
}

/// Credentials that gate admin-only routes.
#[derive(Clone)]
pub struct AdminAuthConfig {
    pub username: String,
    pub password_hash: Option<SecretString>,
    pub bearer_token: Option<SecretString>,
    pub session_ttl: Duration,
}

impl std::fmt::Debug for AdminAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAuthConfig")
            .field("username", &self.username)
            .field(
                "password_hash",
                &self.password_hash.as_ref().map(|_| "[REDACTED]"),
            )
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("session_ttl", &self.session_ttl)
            .finish()
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable cannot be parsed or if the
    /// bearer secret fails validation (length, placeholder, entropy).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("API_DATABASE_URL");
        let host = parse_env("API_HOST", "127.0.0.1")?;
        let port = parse_env("API_PORT", "5000")?;
        let general_inquiry_id = match get_optional_env("API_GENERAL_INQUIRY_ID") {
            Some(raw) => raw.parse::<ProductId>().map_err(|e| {
                ConfigError::InvalidEnvVar("API_GENERAL_INQUIRY_ID".to_string(), e.to_string())
            })?,
            None => ProductId::GENERAL_INQUIRY,
        };
        let cors_origins = get_optional_env("API_CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            database_url,
            host,
            port,
            admin: AdminAuthConfig::from_env()?,
            general_inquiry_id,
            cors_origins,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AdminAuthConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let username = get_env_or_default("API_ADMIN_USERNAME", "admin");

        let password_hash = get_optional_env("API_ADMIN_PASSWORD_HASH")
            .map(|hash| {
                argon2::PasswordHash::new(&hash).map_err(|e| {
                    ConfigError::InvalidEnvVar("API_ADMIN_PASSWORD_HASH".to_string(), e.to_string())
                })?;
                Ok::<_, ConfigError>(SecretString::from(hash))
            })
            .transpose()?;

        let bearer_token = get_optional_env("API_ADMIN_TOKEN")
            .map(|token| {
                validate_token(&token, "API_ADMIN_TOKEN")?;
                Ok::<_, ConfigError>(SecretString::from(token))
            })
            .transpose()?;

        let ttl_seconds: u64 = parse_env("API_SESSION_TTL_SECONDS", "86400")?;

        Ok(Self {
            username,
            password_hash,
            bearer_token,
            session_ttl: Duration::from_secs(ttl_seconds),
        })
    }

    /// Whether any admin credential is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.password_hash.is_some() || self.bearer_token.is_some()
    }

    #[must_use]
    pub fn bearer_token_matches(&self, presented: &str) -> bool {
        self.bearer_token
            .as_ref()
            .is_some_and(|token| constant_time_eq(token.expose_secret(), presented))
    }
}

/// Compare without short-circuiting on the first differing byte.
fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn get_database_url(primary_key: &str) -> SecretString {
    // Try primary key first, then the generic DATABASE_URL
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_or_else(
            |_| SecretString::from(DEFAULT_DATABASE_URL),
            SecretString::from,
        )
}

fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}

fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq = std::collections::HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0usize) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

fn validate_token(token: &str, var_name: &str) -> Result<(), ConfigError> {
    if token.len() < MIN_TOKEN_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("must be at least {MIN_TOKEN_LENGTH} characters"),
        ));
    }

    let lower = token.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(token);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Generate one with `gw-cli admin token`."
            ),
        ));
    }

    Ok(())
}
