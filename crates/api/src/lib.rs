//! Granite World API library.
//!
//! JSON CRUD over products, customer queries and gallery posts, with a
//! bearer-token gate on admin routes. The binary in `main.rs` wires
//! configuration, telemetry and the listener around [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Build the full application router with its middleware stack.
///
/// Sentry layers are added by the binary, outermost.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::routes(&state))
        .layer(middleware::cors_layer(&state.config().cors_origins))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(middleware::trace_layer())
        .with_state(state)
}
