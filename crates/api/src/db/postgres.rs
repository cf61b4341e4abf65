//! `PostgreSQL`-backed [`Store`].

use async_trait::async_trait;
use sqlx::PgPool;

use granite_world_core::{
    CustomerQuery, CustomerQueryDetail, CustomerQueryId, CustomerQueryUpdate, GalleryPost,
    GalleryPostId, NewCustomerQuery, NewGalleryPost, NewProduct, Product, ProductId,
};

use super::customer_queries::CustomerQueryRepository;
use super::gallery_posts::GalleryPostRepository;
use super::products::ProductRepository;
use super::{ProductFilter, RepositoryError, Store};

/// Store backed by a `PostgreSQL` connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    async fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        ProductRepository::new(&self.pool).list(filter).await
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        ProductRepository::new(&self.pool).get_by_id(id).await
    }

    async fn insert_product(
        &self,
        id: ProductId,
        product: &NewProduct,
    ) -> Result<Product, RepositoryError> {
        ProductRepository::new(&self.pool).create(id, product).await
    }

    async fn update_product(
        &self,
        id: ProductId,
        product: &NewProduct,
    ) -> Result<Option<Product>, RepositoryError> {
        ProductRepository::new(&self.pool).update(id, product).await
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError> {
        ProductRepository::new(&self.pool).delete(id).await
    }

    async fn list_customer_queries(&self) -> Result<Vec<CustomerQueryDetail>, RepositoryError> {
        CustomerQueryRepository::new(&self.pool).list().await
    }

    async fn get_customer_query(
        &self,
        id: CustomerQueryId,
    ) -> Result<Option<CustomerQueryDetail>, RepositoryError> {
        CustomerQueryRepository::new(&self.pool).get_by_id(id).await
    }

    async fn insert_customer_query(
        &self,
        query: &NewCustomerQuery,
    ) -> Result<CustomerQuery, RepositoryError> {
        CustomerQueryRepository::new(&self.pool).create(query).await
    }

    async fn update_customer_query(
        &self,
        id: CustomerQueryId,
        update: &CustomerQueryUpdate,
    ) -> Result<Option<CustomerQuery>, RepositoryError> {
        CustomerQueryRepository::new(&self.pool)
            .update(id, update)
            .await
    }

    async fn delete_customer_query(&self, id: CustomerQueryId) -> Result<bool, RepositoryError> {
        CustomerQueryRepository::new(&self.pool).delete(id).await
    }

    async fn list_gallery_posts(
        &self,
        featured_only: bool,
    ) -> Result<Vec<GalleryPost>, RepositoryError> {
        GalleryPostRepository::new(&self.pool)
            .list(featured_only)
            .await
    }

    async fn get_gallery_post(
        &self,
        id: GalleryPostId,
    ) -> Result<Option<GalleryPost>, RepositoryError> {
        GalleryPostRepository::new(&self.pool).get_by_id(id).await
    }

    async fn insert_gallery_post(
        &self,
        post: &NewGalleryPost,
    ) -> Result<GalleryPost, RepositoryError> {
        GalleryPostRepository::new(&self.pool).create(post).await
    }

    async fn replace_gallery_post(
        &self,
        id: GalleryPostId,
        post: &NewGalleryPost,
    ) -> Result<Option<GalleryPost>, RepositoryError> {
        GalleryPostRepository::new(&self.pool)
            .replace(id, post)
            .await
    }

    async fn delete_gallery_post(&self, id: GalleryPostId) -> Result<bool, RepositoryError> {
        GalleryPostRepository::new(&self.pool).delete(id).await
    }
}
