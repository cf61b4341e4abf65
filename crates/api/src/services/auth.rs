//! Admin authentication.
//!
//! Two kinds of bearer token unlock admin routes:
//! - the static shared secret from `API_ADMIN_TOKEN`, for scripts
//! - login tokens issued by [`AuthService::login`], held in a TTL cache

use std::time::Duration;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use moka::future::Cache;
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AdminAuthConfig;

/// Upper bound on concurrently valid login tokens.
const MAX_SESSIONS: u64 = 1_000;

/// Errors from admin authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("password login is not configured")]
    LoginDisabled,

    #[error("password hashing failed")]
    PasswordHash,
}

/// How an admin request was authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// `API_ADMIN_TOKEN`
    Shared,
    /// Issued by `/api/auth/login`
    Login,
}

/// The validated identity behind an admin request.
///
/// Inserted into request extensions by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    pub username: String,
    pub kind: TokenKind,
    pub issued_at: DateTime<Utc>,
}

/// A freshly issued login token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: u64,
    pub session: AdminSession,
}

/// Verifies admin credentials and tracks issued login tokens.
#[derive(Clone)]
pub struct AuthService {
    config: AdminAuthConfig,
    sessions: Cache<String, AdminSession>,
}

impl AuthService {
    #[must_use]
    pub fn new(config: AdminAuthConfig) -> Self {
        let sessions = Cache::builder()
            .max_capacity(MAX_SESSIONS)
            .time_to_live(config.session_ttl)
            .build();
        Self { config, sessions }
    }

    #[must_use]
    pub const fn config(&self) -> &AdminAuthConfig {
        &self.config
    }

    #[must_use]
    pub const fn session_ttl(&self) -> Duration {
        self.config.session_ttl
    }

    /// Check a username/password pair and issue a login token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::LoginDisabled` if no password hash is configured,
    /// `AuthError::InvalidCredentials` if the username or password is wrong.
    pub async fn login(&self, username: &str, password: &str) -> Result<IssuedToken, AuthError> {
        let hash = self
            .config
            .password_hash
            .as_ref()
            .ok_or(AuthError::LoginDisabled)?;

        // Always run the hash so a wrong username costs as much as a wrong password
        let password_ok = verify_password(password, hash.expose_secret()).is_ok();
        if !password_ok || username != self.config.username {
            return Err(AuthError::InvalidCredentials);
        }

        let session = AdminSession {
            username: self.config.username.clone(),
            kind: TokenKind::Login,
            issued_at: Utc::now(),
        };
        let token = generate_token();
        self.sessions.insert(token.clone(), session.clone()).await;

        Ok(IssuedToken {
            token,
            expires_in: self.config.session_ttl.as_secs(),
            session,
        })
    }

    /// Resolve a bearer token to the session it represents.
    pub async fn authenticate(&self, token: &str) -> Option<AdminSession> {
        if self.config.bearer_token_matches(token) {
            return Some(AdminSession {
                username: self.config.username.clone(),
                kind: TokenKind::Shared,
                issued_at: Utc::now(),
            });
        }
        self.sessions.get(token).await
    }

    /// Revoke a login token. Returns `false` if it was not live.
    ///
    /// The shared secret cannot be revoked this way.
    pub async fn logout(&self, token: &str) -> bool {
        self.sessions.remove(token).await.is_some()
    }
}

/// Generate a random 256-bit URL-safe token.
#[must_use]
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<SecretString, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| SecretString::from(hash.to_string()))
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a PHC hash string.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` on mismatch or a malformed hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub const TEST_PASSWORD: &str = "granite-counter-42";
    pub const TEST_SHARED_TOKEN: &str = "kQ7vR2mX9pL4wN8zT1bY6cF3hJ5dG0sA";

    pub fn test_config() -> AdminAuthConfig {
        AdminAuthConfig {
            username: "admin".to_string(),
            password_hash: Some(hash_password(TEST_PASSWORD).unwrap()),
            bearer_token: Some(SecretString::from(TEST_SHARED_TOKEN)),
            session_ttl: Duration::from_secs(60),
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("hunter22").unwrap();
        assert!(verify_password("hunter22", hash.expose_secret()).is_ok());
        assert!(verify_password("hunter23", hash.expose_secret()).is_err());
        assert!(verify_password("hunter22", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_generate_token_is_random() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 43);
    }

    #[tokio::test]
    async fn test_login_issues_usable_token() {
        let auth = AuthService::new(test_config());
        let issued = auth.login("admin", TEST_PASSWORD).await.unwrap();
        assert_eq!(issued.session.kind, TokenKind::Login);
        assert_eq!(issued.expires_in, 60);

        let session = auth.authenticate(&issued.token).await.unwrap();
        assert_eq!(session.username, "admin");

        assert!(auth.logout(&issued.token).await);
        assert!(auth.authenticate(&issued.token).await.is_none());
        assert!(!auth.logout(&issued.token).await);
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_credentials() {
        let auth = AuthService::new(test_config());
        assert!(matches!(
            auth.login("admin", "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("root", TEST_PASSWORD).await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_login_disabled_without_hash() {
        let auth = AuthService::new(AdminAuthConfig {
            password_hash: None,
            ..test_config()
        });
        assert!(matches!(
            auth.login("admin", TEST_PASSWORD).await,
            Err(AuthError::LoginDisabled)
        ));
    }

    #[tokio::test]
    async fn test_shared_token_authenticates() {
        let auth = AuthService::new(test_config());
        let session = auth.authenticate(TEST_SHARED_TOKEN).await.unwrap();
        assert_eq!(session.kind, TokenKind::Shared);
        assert!(auth.authenticate("demo-token").await.is_none());
    }
}
