//! Record storage.
//!
//! Handlers talk to a [`Store`] trait object so the same routes run against
//! `PostgreSQL` in production and an in-process store in tests and local
//! development (`API_DATABASE_URL=memory://`).
//!
//! ## Tables
//!
//! - `products` - Catalogue, including the "General Inquiry" sentinel
//! - `customer_queries` - Contact and product inquiries
//! - `gallery_posts` - Installation showcase
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p granite-world-cli -- migrate
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use granite_world_core::{
    CustomerQuery, CustomerQueryDetail, CustomerQueryId, CustomerQueryUpdate,
    GENERAL_INQUIRY_NAME, GalleryPost, GalleryPostId, NewCustomerQuery, NewGalleryPost, NewProduct,
    Product, ProductId, is_reserved_name,
};

pub mod customer_queries;
pub mod gallery_posts;
pub mod memory;
pub mod postgres;
pub mod products;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Embedded migrations for the API schema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("data corruption: {0}")]
    DataCorruption(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Which products a listing returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductFilter {
    pub featured_only: bool,
    /// Hide the sentinel: both this ID and anything carrying the reserved name.
    pub hide_general_inquiry: Option<ProductId>,
    pub limit: Option<u32>,
}

/// Persistent collection store for all three record kinds.
///
/// `update_*`/`delete_*` return `None`/`false` when the ID does not exist;
/// callers turn that into a 404.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Cheap connectivity check for readiness probes.
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// Products ordered oldest first.
    async fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>, RepositoryError>;
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;
    async fn insert_product(
        &self,
        id: ProductId,
        product: &NewProduct,
    ) -> Result<Product, RepositoryError>;
    async fn update_product(
        &self,
        id: ProductId,
        product: &NewProduct,
    ) -> Result<Option<Product>, RepositoryError>;
    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError>;

    /// Queries newest first, each with its product expanded.
    async fn list_customer_queries(&self) -> Result<Vec<CustomerQueryDetail>, RepositoryError>;
    async fn get_customer_query(
        &self,
        id: CustomerQueryId,
    ) -> Result<Option<CustomerQueryDetail>, RepositoryError>;
    async fn insert_customer_query(
        &self,
        query: &NewCustomerQuery,
    ) -> Result<CustomerQuery, RepositoryError>;
    async fn update_customer_query(
        &self,
        id: CustomerQueryId,
        update: &CustomerQueryUpdate,
    ) -> Result<Option<CustomerQuery>, RepositoryError>;
    async fn delete_customer_query(&self, id: CustomerQueryId) -> Result<bool, RepositoryError>;

    /// Posts newest first.
    async fn list_gallery_posts(
        &self,
        featured_only: bool,
    ) -> Result<Vec<GalleryPost>, RepositoryError>;
    async fn get_gallery_post(
        &self,
        id: GalleryPostId,
    ) -> Result<Option<GalleryPost>, RepositoryError>;
    async fn insert_gallery_post(
        &self,
        post: &NewGalleryPost,
    ) -> Result<GalleryPost, RepositoryError>;
    /// Replace every writable field; `likes` is kept.
    async fn replace_gallery_post(
        &self,
        id: GalleryPostId,
        post: &NewGalleryPost,
    ) -> Result<Option<GalleryPost>, RepositoryError>;
    async fn delete_gallery_post(&self, id: GalleryPostId) -> Result<bool, RepositoryError>;
}

/// Shared handle to the configured store.
pub type DynStore = Arc<dyn Store>;

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Whether `database_url` selects the in-process store.
#[must_use]
pub fn is_memory_url(database_url: &SecretString) -> bool {
    database_url.expose_secret().starts_with("memory:")
}

/// Open the store selected by `database_url`.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if `PostgreSQL` is unreachable.
pub async fn open_store(database_url: &SecretString) -> Result<DynStore, RepositoryError> {
    if is_memory_url(database_url) {
        return Ok(Arc::new(MemoryStore::new()));
    }
    let pool = create_pool(database_url).await?;
    Ok(Arc::new(PgStore::new(pool)))
}

/// Insert the "General Inquiry" sentinel under `id` unless it already exists.
///
/// Returns `true` if the record was created.
///
/// # Errors
///
/// Returns `RepositoryError` if the lookup or insert fails, and
/// `RepositoryError::Conflict` if the reserved name is already held by a
/// product under a different ID.
pub async fn ensure_general_inquiry(
    store: &dyn Store,
    id: ProductId,
) -> Result<bool, RepositoryError> {
    if store.get_product(id).await?.is_some() {
        return Ok(false);
    }
    match store.insert_product(id, &NewProduct::general_inquiry()).await {
        Ok(_) => Ok(true),
        Err(RepositoryError::Conflict(reason)) => {
            // Another seeder may have inserted the same ID first.
            if store.get_product(id).await?.is_some() {
                return Ok(false);
            }
            let existing = store
                .list_products(ProductFilter::default())
                .await?
                .into_iter()
                .find(|p| is_reserved_name(&p.name));
            Err(match existing {
                Some(other) => RepositoryError::Conflict(format!(
                    "\"{GENERAL_INQUIRY_NAME}\" already exists as product {}, not {id}",
                    other.id
                )),
                None => RepositoryError::Conflict(reason),
            })
        }
        Err(e) => Err(e),
    }
}
