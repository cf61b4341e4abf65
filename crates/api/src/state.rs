//! Application state shared across handlers.

use std::sync::Arc;

use granite_world_core::ProductId;

use crate::config::ApiConfig;
use crate::db::{DynStore, Store};
use crate::services::auth::AuthService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the record store, admin authentication and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    store: DynStore,
    auth: AuthService,
}

impl AppState {
    #[must_use]
    pub fn new(config: ApiConfig, store: DynStore) -> Self {
        let auth = AuthService::new(config.admin.clone());
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                auth,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the record store.
    #[must_use]
    pub fn store(&self) -> &dyn Store {
        self.inner.store.as_ref()
    }

    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// ID of the "General Inquiry" sentinel product.
    #[must_use]
    pub fn general_inquiry_id(&self) -> ProductId {
        self.inner.config.general_inquiry_id
    }
}
