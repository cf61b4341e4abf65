//! Authentication extractor and session helpers for admin.

use axum::{
    extract::{FromRequestParts, Request},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::error::SessionExpired;
use crate::models::session::StoredAdmin;
use crate::models::{CurrentAdmin, Flash, session_keys};

/// Extractor that requires admin authentication.
///
/// Redirects to `/auth/login` when no admin is stored in the session.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAuth(admin): RequireAdminAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.username)
/// }
/// ```
pub struct RequireAdminAuth(pub CurrentAdmin);

/// Error returned when admin authentication is required but missing.
pub enum AdminAuthRejection {
    /// Redirect to login page.
    RedirectToLogin,
    /// Session layer missing from the stack.
    MissingSession,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::MissingSession => {
                tracing::error!("Session layer not installed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection::MissingSession)?;

        let admin: CurrentAdmin = session
            .get::<StoredAdmin>(session_keys::CURRENT_ADMIN)
            .await
            .ok()
            .flatten()
            .map(CurrentAdmin::from)
            .ok_or(AdminAuthRejection::RedirectToLogin)?;

        tracing::Span::current().record("admin", admin.username.as_str());
        Ok(Self(admin))
    }
}

/// Store the logged-in admin, rotating the session id.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session
        .insert(session_keys::CURRENT_ADMIN, StoredAdmin::from(admin))
        .await
}

/// Remove everything from the session.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

/// Queue a message for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn set_flash(session: &Session, flash: Flash) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::FLASH, flash).await
}

/// Take the pending flash message, if any.
pub async fn take_flash(session: &Session) -> Option<Flash> {
    session
        .remove::<Flash>(session_keys::FLASH)
        .await
        .ok()
        .flatten()
}

/// Drop the session when a handler reports that the API rejected its token.
pub async fn expire_session_middleware(request: Request, next: Next) -> Response {
    let session = request.extensions().get::<Session>().cloned();
    let response = next.run(request).await;

    if response.extensions().get::<SessionExpired>().is_some()
        && let Some(session) = session
        && let Err(e) = session.flush().await
    {
        tracing::error!(error = %e, "Failed to clear expired admin session");
    }

    response
}
