//! Session-related types for admin authentication.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// The logged-in admin, as held in the browser session.
///
/// `token` is the API bearer token issued at login and is sent with every
/// admin API call.
#[derive(Clone)]
pub struct CurrentAdmin {
    pub username: String,
    pub token: SecretString,
}

impl std::fmt::Debug for CurrentAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrentAdmin")
            .field("username", &self.username)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Serialized form of [`CurrentAdmin`] inside the session store.
#[derive(Serialize, Deserialize)]
pub(crate) struct StoredAdmin {
    username: String,
    token: String,
}

impl From<&CurrentAdmin> for StoredAdmin {
    fn from(admin: &CurrentAdmin) -> Self {
        Self {
            username: admin.username.clone(),
            token: admin.token.expose_secret().to_string(),
        }
    }
}

impl From<StoredAdmin> for CurrentAdmin {
    fn from(stored: StoredAdmin) -> Self {
        Self {
            username: stored.username,
            token: SecretString::from(stored.token),
        }
    }
}

/// A one-shot message shown on the next page load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub success: bool,
    pub message: String,
}

impl Flash {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Session keys for admin data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for the pending flash message.
    pub const FLASH: &str = "flash";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let admin = CurrentAdmin {
            username: "admin".to_string(),
            token: SecretString::from("kQ7vR2mX9pL4wN8zT1bY6cF3hJ5dG0sA"),
        };
        let debug = format!("{admin:?}");
        assert!(debug.contains("admin"));
        assert!(!debug.contains("kQ7vR2mX9pL4wN8zT1bY6cF3hJ5dG0sA"));
    }

    #[test]
    fn test_stored_admin_round_trip_keeps_token() {
        let admin = CurrentAdmin {
            username: "admin".to_string(),
            token: SecretString::from("abc"),
        };
        let restored = CurrentAdmin::from(StoredAdmin::from(&admin));
        assert_eq!(restored.username, "admin");
        assert_eq!(restored.token.expose_secret(), "abc");
    }
}
