//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Failures render the error
//! page: 404 for missing resources, 502 when the API is unreachable or
//! misbehaves.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use granite_world_client::ClientError;

use crate::filters;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Call to the Granite World API failed.
    #[error("API error: {0}")]
    Api(#[from] ClientError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error page template.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub title: &'static str,
    pub message: String,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Api(ClientError::NotFound(_)) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Api(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

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
        let (title, message) = match status {
            StatusCode::NOT_FOUND => (
                "Not found",
                "We couldn't find what you were looking for.".to_string(),
            ),
            StatusCode::BAD_GATEWAY => (
                "Temporarily unavailable",
                "Our catalogue is temporarily unavailable. Please try again shortly.".to_string(),
            ),
            _ => ("Something went wrong", "Internal server error".to_string()),
        };

        let template = ErrorTemplate {
            status: status.as_u16(),
            title,
            message,
        };
        match template.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to render error page");
                (status, template.message).into_response()
            }
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
