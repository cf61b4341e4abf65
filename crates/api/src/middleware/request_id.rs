//! Request correlation IDs.
//!
//! Reuses an upstream `x-request-id` when it is a sane header value,
//! otherwise mints a UUID v4. The ID is recorded on the tracing span,
//! tagged in Sentry and echoed on the response.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Longest upstream ID we accept before minting our own.
const MAX_UPSTREAM_LEN: usize = 128;

/// The correlation ID for the current request, available as an extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub HeaderValue);

pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .filter(|value| value.len() <= MAX_UPSTREAM_LEN && value.to_str().is_ok())
        .cloned()
        .unwrap_or_else(|| {
            HeaderValue::from_str(&Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("invalid"))
        });

    let id_str = request_id.to_str().unwrap_or_default().to_owned();
    tracing::Span::current().record("request_id", id_str.as_str());
    sentry::configure_scope(|scope| scope.set_tag("request_id", &id_str));

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(REQUEST_ID_HEADER.clone(), request_id);
    response
}
