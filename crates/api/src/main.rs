//! Granite World API - JSON CRUD service.
//!
//! This binary serves the REST API on port 5000. The storefront and admin
//! panel talk to it over HTTP and never touch the database themselves.
//!
//! # Storage
//!
//! `API_DATABASE_URL` selects the backend:
//! - `postgres://...` uses `PostgreSQL` (run `gw-cli migrate` first)
//! - `memory://` keeps everything in process and is lost on restart

#![cfg_attr(not(test), forbid(unsafe_code))]

use granite_world_api::config::ApiConfig;
use granite_world_api::db;
use granite_world_api::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ApiConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Install the tracing subscriber. `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "granite_world_api=info,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let fmt_layer = if json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let config = ApiConfig::from_env().expect("Failed to load configuration");

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    if !config.admin.is_enabled() {
        tracing::warn!(
            "Neither API_ADMIN_PASSWORD_HASH nor API_ADMIN_TOKEN is set; admin routes will reject every request"
        );
    }

    let store = db::open_store(&config.database_url)
        .await
        .expect("Failed to open store");

    if db::is_memory_url(&config.database_url) {
        tracing::warn!("Using in-memory store; data is lost on restart");
        let created = db::ensure_general_inquiry(store.as_ref(), config.general_inquiry_id)
            .await
            .expect("Failed to seed General Inquiry product");
        tracing::info!(created, id = %config.general_inquiry_id, "General Inquiry product ready");
    } else {
        // Migrations and seeding are explicit:
        //   gw-cli migrate && gw-cli seed general-inquiry
        tracing::info!("Database pool created");
    }

    let addr = config.socket_addr();
    let state = AppState::new(config, store);

    let app = granite_world_api::app(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    tracing::info!("api listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
