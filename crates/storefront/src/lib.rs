//! Granite World storefront library.
//!
//! Server-rendered public site. All data comes from the Granite World API
//! through `granite-world-client`; this crate holds no storage of its own.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalogue;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod state;

use std::path::Path;

use axum::{Router, routing::get};
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Build the storefront router with its middleware stack.
///
/// `static_dir` is served under `/static`. Sentry layers are added by the
/// binary, outermost.
pub fn app(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(middleware::trace_layer())
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> error::AppError {
    error::AppError::NotFound("page".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;
    use crate::config::StorefrontConfig;

    /// State pointing at a port nothing listens on.
    fn unreachable_state() -> AppState {
        AppState::new(StorefrontConfig {
            host: [127, 0, 0, 1].into(),
            port: 0,
            api_url: "http://127.0.0.1:9".to_string(),
            sentry_dsn: None,
            sentry_environment: None,
        })
        .unwrap()
    }

    async fn get(uri: &str) -> (StatusCode, String, axum::http::HeaderMap) {
        let app = app(unreachable_state(), Path::new("static"));
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap(), headers)
    }

    #[tokio::test]
    async fn test_about_renders_without_api() {
        let (status, body, headers) = get("/about").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("About Granite World"));
        assert!(headers.contains_key(header::CONTENT_SECURITY_POLICY));
        assert!(headers.contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_catalogue_is_bad_gateway_when_api_down() {
        let (status, body, _) = get("/products").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.contains("temporarily unavailable"));
    }

    #[tokio::test]
    async fn test_contact_not_ready_when_api_down() {
        let (status, body, _) = get("/contact").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Contact form is not ready"));
        assert!(body.contains("disabled"));
    }

    #[tokio::test]
    async fn test_malformed_ids_are_not_found() {
        let (status, _, _) = get("/products/not-a-uuid").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _, _) = get("/gallery/not-a-uuid").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_route_renders_error_page() {
        let (status, body, _) = get("/cart").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("couldn&#x27;t find") || body.contains("couldn't find"));
    }
}
