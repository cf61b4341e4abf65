//! Integration tests for Granite World.
//!
//! Every test boots its own API (in-memory store), storefront and admin
//! panel on ephemeral ports, so no database or running servers are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p granite-world-integration-tests
//! ```
//!
//! # Test Files
//!
//! - `api_client` - Typed client against a live API
//! - `storefront` - Public pages and inquiry submission
//! - `admin` - Login, product, inquiry and gallery management

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use secrecy::SecretString;

use granite_world_admin::config::AdminConfig;
use granite_world_api::config::{AdminAuthConfig, ApiConfig};
use granite_world_api::db::{MemoryStore, ensure_general_inquiry};
use granite_world_api::services::auth::hash_password;
use granite_world_client::ApiClient;
use granite_world_core::ProductId;
use granite_world_storefront::config::StorefrontConfig;

/// Admin username configured on the test API.
pub const ADMIN_USERNAME: &str = "admin";

/// Admin password configured on the test API.
pub const ADMIN_PASSWORD: &str = "quarry-polish-2718";

/// Running API, storefront and admin servers.
pub struct TestContext {
    pub api_url: String,
    pub storefront_url: String,
    pub admin_url: String,
    pub general_inquiry_id: ProductId,
}

impl TestContext {
    /// Start all three servers with the General Inquiry product seeded.
    pub async fn start() -> Self {
        Self::start_with_seed(true).await
    }

    /// Start all three servers, optionally skipping the sentinel seed.
    pub async fn start_with_seed(seed: bool) -> Self {
        let general_inquiry_id = ProductId::generate();
        let store = Arc::new(MemoryStore::new());
        if seed {
            ensure_general_inquiry(&*store, general_inquiry_id)
                .await
                .expect("seed General Inquiry");
        }

        let api_config = ApiConfig {
            database_url: SecretString::from("memory://"),
            host: [127, 0, 0, 1].into(),
            port: 0,
            admin: AdminAuthConfig {
                username: ADMIN_USERNAME.to_string(),
                password_hash: Some(hash_password(ADMIN_PASSWORD).expect("hash password")),
                bearer_token: None,
                session_ttl: Duration::from_secs(600),
            },
            general_inquiry_id,
            cors_origins: Vec::new(),
            sentry_dsn: None,
            sentry_environment: None,
        };
        let api_state = granite_world_api::state::AppState::new(api_config, store);
        let api_url = serve(granite_world_api::app(api_state)).await;

        let storefront_state = granite_world_storefront::state::AppState::new(StorefrontConfig {
            host: [127, 0, 0, 1].into(),
            port: 0,
            api_url: api_url.clone(),
            sentry_dsn: None,
            sentry_environment: None,
        })
        .expect("storefront state");
        let storefront_url = serve(granite_world_storefront::app(
            storefront_state,
            &crate_dir("storefront").join("static"),
        ))
        .await;

        let admin_state = granite_world_admin::state::AppState::new(AdminConfig {
            host: [127, 0, 0, 1].into(),
            port: 0,
            api_url: api_url.clone(),
            base_url: "http://localhost".to_string(),
            sentry_dsn: None,
            sentry_environment: None,
        })
        .expect("admin state");
        let admin_url = serve(granite_world_admin::app(
            admin_state,
            &crate_dir("admin").join("static"),
        ))
        .await;

        Self {
            api_url,
            storefront_url,
            admin_url,
            general_inquiry_id,
        }
    }

    /// Typed client for the test API.
    #[must_use]
    pub fn api(&self) -> ApiClient {
        ApiClient::new(&self.api_url).expect("api client")
    }

    /// Browser-like client that keeps cookies and follows redirects.
    #[must_use]
    pub fn browser() -> reqwest::Client {
        reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("http client")
    }

    /// Browser-like client that stops at redirects.
    #[must_use]
    pub fn browser_no_redirect() -> reqwest::Client {
        reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("http client")
    }

    /// Log `browser` into the admin panel.
    pub async fn admin_login(&self, browser: &reqwest::Client) {
        let response = browser
            .post(format!("{}/auth/login", self.admin_url))
            .form(&[("username", ADMIN_USERNAME), ("password", ADMIN_PASSWORD)])
            .send()
            .await
            .expect("admin login");
        assert!(response.status().is_success(), "login failed: {}", response.status());
    }
}

fn crate_dir(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(name)
}

/// Serve `app` on an ephemeral localhost port and return its base URL.
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });
    format!("http://{addr}")
}
