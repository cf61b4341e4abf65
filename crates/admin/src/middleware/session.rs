//! Session middleware configuration for admin.
//!
//! In-memory sessions with strict cookie settings (SameSite=Strict,
//! HttpOnly, 24 hour inactivity expiry). Sessions do not survive a restart;
//! neither do the API tokens they hold.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::AdminConfig;

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "gw_admin_session";

/// Session expiry time in seconds (24 hours).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &AdminConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
