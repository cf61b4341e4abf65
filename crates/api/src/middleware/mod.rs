//! HTTP middleware stack for the API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (`http_request` span with status and latency)
//! 3. Request ID (recorded on the span)
//! 4. CORS
//! 5. Admin bearer gate (`route_layer` on mutating routes only)

pub mod auth;
pub mod request_id;

use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderValue, Method, Request, Response, header};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

pub use auth::{RequireAdmin, require_admin};
pub use request_id::request_id_middleware;

/// Build the CORS layer. An empty origin list allows any origin.
#[must_use]
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| {
                HeaderValue::from_str(origin)
                    .inspect_err(|e| tracing::warn!(%origin, error = %e, "Ignoring CORS origin"))
                    .ok()
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

type MakeSpanFn = fn(&Request<Body>) -> Span;
type OnResponseFn = fn(&Response<Body>, Duration, &Span);

type HttpTraceLayer =
    TraceLayer<SharedClassifier<ServerErrorsAsFailures>, MakeSpanFn, DefaultOnRequest, OnResponseFn>;

fn make_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = tracing::field::Empty,
        admin = tracing::field::Empty,
        status = tracing::field::Empty,
        latency_ms = tracing::field::Empty,
    )
}

fn on_response(response: &Response<Body>, latency: Duration, span: &Span) {
    span.record("status", response.status().as_u16());
    span.record(
        "latency_ms",
        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
    );
    DefaultOnResponse::default().on_response(response, latency, span);
}

/// Request tracing with an `http_request` span per request.
#[must_use]
pub fn trace_layer() -> HttpTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(make_span as MakeSpanFn)
        .on_response(on_response as OnResponseFn)
}
