//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_API_URL` - API origin (fallback `API_URL`, default: <http://localhost:5000>)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Granite World API origin, without trailing slash
    pub api_url: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "production")
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env("STOREFRONT_PORT", "3000")?;

        let api_url = get_optional_env("STOREFRONT_API_URL")
            .or_else(|| get_optional_env("API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = validate_api_url("STOREFRONT_API_URL", &api_url)?;

        Ok(Self {
            host,
            port,
            api_url,
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

/// Check that `raw` is an http(s) URL and strip trailing slashes.
fn validate_api_url(key: &str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = url::Url::parse(trimmed)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(trimmed.to_string())
}

fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}

fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_api_url_strips_trailing_slash() {
        assert_eq!(
            validate_api_url("X", "http://localhost:5000/").unwrap(),
            "http://localhost:5000"
        );
        assert_eq!(
            validate_api_url("X", " https://api.graniteworld.example// ").unwrap(),
            "https://api.graniteworld.example"
        );
    }

    #[test]
    fn test_validate_api_url_rejects_garbage() {
        assert!(validate_api_url("X", "not a url").is_err());
        assert!(validate_api_url("X", "file:///etc/passwd").is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "0.0.0.0".parse().unwrap(),
            port: 3000,
            api_url: DEFAULT_API_URL.to_string(),
            sentry_dsn: None,
            sentry_environment: None,
        };
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
    }
}
