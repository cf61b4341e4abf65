//! Granite World admin panel library.
//!
//! Server-rendered panel for managing products, customer inquiries and
//! gallery posts. Every read and write goes through the Granite World API
//! with the bearer token obtained at login; this crate keeps no records of
//! its own, only browser sessions.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

use std::path::Path;

use axum::{Router, routing::get};
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Build the admin router with its middleware stack.
///
/// `static_dir` is served under `/static`. Sentry layers are added by the
/// binary, outermost.
pub fn app(state: AppState, static_dir: &Path) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .layer(axum::middleware::from_fn(
            middleware::expire_session_middleware,
        ))
        .layer(session_layer)
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
    use axum::http::{Method, Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;
    use crate::config::AdminConfig;

    fn unreachable_state() -> AppState {
        AppState::new(AdminConfig {
            host: [127, 0, 0, 1].into(),
            port: 0,
            api_url: "http://127.0.0.1:9".to_string(),
            base_url: "http://localhost:3001".to_string(),
            sentry_dsn: None,
            sentry_environment: None,
        })
        .unwrap()
    }

    async fn send(method: Method, uri: &str, body: &str) -> axum::response::Response {
        let app = app(unreachable_state(), Path::new("static"));
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        app.oneshot(request).await.unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = send(Method::GET, "/health", "").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_protected_pages_redirect_to_login() {
        for uri in ["/", "/products", "/products/new", "/inquiries", "/gallery"] {
            let response = send(Method::GET, uri, "").await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
            assert_eq!(response.headers()[header::LOCATION], "/auth/login", "{uri}");
        }

        let response = send(Method::POST, "/products/abc/delete", "").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_login_page_renders_with_headers() {
        let response = send(Method::GET, "/auth/login?expired=1", "").await;
        assert_eq!(response.status(), StatusCode::OK);
        let csp = response.headers()[header::CONTENT_SECURITY_POLICY]
            .to_str()
            .unwrap()
            .to_string();
        assert!(csp.contains("default-src 'none'"));
        assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "DENY");

        let html = body_text(response).await;
        assert!(html.contains("name=\"password\""));
        assert!(html.contains("Your session has expired"));
    }

    #[tokio::test]
    async fn test_login_with_api_down_shows_error() {
        let response = send(Method::POST, "/auth/login", "username=admin&password=secret").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let html = body_text(response).await;
        assert!(html.contains("Sign-in is unavailable"));
        assert!(html.contains("value=\"admin\""));
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = send(Method::GET, "/nope", "").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Not found"));
    }
}
