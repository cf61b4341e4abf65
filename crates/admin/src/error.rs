//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. A 401 from the API means
//! the stored token is gone (expired, revoked, API restarted): the response
//! redirects to login and carries a [`SessionExpired`] marker so the
//! session middleware can drop the stale session.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use thiserror::Error;

use granite_world_client::ClientError;

use crate::filters;

/// Application-level error type for admin.
#[derive(Debug, Error)]
pub enum AppError {
    /// Call to the Granite World API failed.
    #[error("API error: {0}")]
    Api(#[from] ClientError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Template rendering failed.
    #[error("Template error: {0}")]
    Render(#[from] askama::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Response extension set when the API rejected the admin's token.
#[derive(Debug, Clone, Copy)]
pub struct SessionExpired;

/// Error page template.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub message: String,
}

impl AppError {
    /// HTTP status for this error (redirects excluded).
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Api(ClientError::NotFound(_)) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Api(ClientError::Unauthorized(_)) => StatusCode::UNAUTHORIZED,
            Self::Api(_) => StatusCode::BAD_GATEWAY,
            Self::Session(_) | Self::Render(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status == StatusCode::UNAUTHORIZED {
            tracing::info!("API rejected admin token, ending session");
            let mut response = Redirect::to("/auth/login?expired=1").into_response();
            response.extensions_mut().insert(SessionExpired);
            return response;
        }

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match status {
            StatusCode::NOT_FOUND => "Not found".to_string(),
            StatusCode::BAD_GATEWAY => "The Granite World API is unavailable".to_string(),
            _ => "Internal server error".to_string(),
        };

        let template = ErrorTemplate {
            status: status.as_u16(),
            message,
        };
        match template.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(_) => (status, template.message).into_response(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Api(ClientError::NotFound("x".to_string()))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Api(ClientError::Api {
                status: 500,
                message: "x".to_string()
            })),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::Internal("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unauthorized_redirects_and_marks_session() {
        let response = AppError::Api(ClientError::Unauthorized("expired".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(response.extensions().get::<SessionExpired>().is_some());
        assert_eq!(
            response.headers().get("location").and_then(|v| v.to_str().ok()),
            Some("/auth/login?expired=1")
        );
    }
}
