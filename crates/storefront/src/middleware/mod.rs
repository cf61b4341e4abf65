//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (`http_request` span with status and latency)
//! 3. Request ID (recorded on the span)
//! 4. Security headers (CSP, frame and referrer policy)

pub mod request_id;
pub mod security_headers;

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;

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
