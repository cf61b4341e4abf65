//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Errors render as
//! `{"message": "...", "error": "..."}` JSON; server errors are captured to
//! Sentry before responding and their details are not exposed.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use granite_world_core::ValidationError;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Storage operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Admin authentication failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Payload failed field validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Body or path could not be parsed.
    #[error("Bad request: {message}")]
    BadRequest { message: String, detail: String },

    /// Resource not found.
    #[error("{0}")]
    NotFound(&'static str),

    /// Missing or invalid bearer token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AppError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) | Self::Auth(AuthError::PasswordHash) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Auth(_) | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Validation(_) | Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn body(&self) -> ErrorBody {
        // Don't expose internal error details to clients
        let (message, error) = match self {
            Self::Database(_) | Self::Internal(_) | Self::Auth(AuthError::PasswordHash) => {
                ("Internal server error".to_string(), None)
            }
            Self::Auth(_) => ("Invalid credentials".to_string(), None),
            Self::Validation(err) => (err.to_string(), Some(err.field().to_string())),
            Self::BadRequest { message, detail } => (message.clone(), Some(detail.clone())),
            Self::NotFound(message) => ((*message).to_string(), None),
            Self::Unauthorized(message) => (message.clone(), None),
        };
        ErrorBody { message, error }
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

        (status, Json(self.body())).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest {
            message: "Invalid request body".to_string(),
            detail: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest {
            message: "Invalid id".to_string(),
            detail: rejection.body_text(),
        }
    }
}

/// `Json` extractor whose rejections render as [`AppError`] JSON.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `Path` extractor whose rejections render as [`AppError`] JSON.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
