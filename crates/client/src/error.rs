//! Client error taxonomy.

use thiserror::Error;

/// Errors returned by [`crate::ApiClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned 404.
    #[error("not found: {0}")]
    NotFound(String),

    /// The API returned 401; the token is missing, revoked or expired.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The API rejected the payload with 400.
    #[error("{0}")]
    Validation(String),

    /// Any other non-success status.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured base URL is unusable.
    #[error("invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    /// Whether the API reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether the admin token was rejected.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// The message to show next to a form, if this is a validation failure.
    #[must_use]
    pub fn validation_message(&self) -> Option<&str> {
        match self {
            Self::Validation(message) => Some(message),
            _ => None,
        }
    }
}
