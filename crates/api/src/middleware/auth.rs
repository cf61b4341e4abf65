//! Bearer-token gate for admin routes.
//!
//! Applied with `route_layer` so unmatched paths still 404. A valid token
//! inserts an [`AdminSession`] into request extensions, which handlers can
//! pull out with the [`RequireAdmin`] extractor.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::AdminSession;
use crate::state::AppState;

/// Extract the token from an `Authorization: Bearer <token>` header.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Reject requests without a valid admin bearer token.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` if the token is missing, unknown or expired.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = request.into_parts();

    let token = bearer_token(&parts.headers)
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;
    let session = state
        .auth()
        .authenticate(token)
        .await
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".to_string()))?;

    tracing::Span::current().record("admin", session.username.as_str());
    parts.extensions.insert(session);

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Extractor for the session established by [`require_admin`].
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AdminSession);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminSession>()
            .cloned()
            .map(Self)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn headers(value: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(value) = value {
            headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        }
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers(Some("Bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&headers(Some("Bearer   "))), None);
        assert_eq!(bearer_token(&headers(Some("Basic abc"))), None);
        assert_eq!(bearer_token(&headers(None)), None);
    }
}
