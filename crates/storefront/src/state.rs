//! Application state shared across handlers.

use std::sync::Arc;

use granite_world_client::{ApiClient, ClientError};

use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the API client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, ClientError> {
        let api = ApiClient::new(&config.api_url)?;
        Ok(Self {
            inner: Arc::new(AppStateInner { config, api }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Granite World API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }
}
