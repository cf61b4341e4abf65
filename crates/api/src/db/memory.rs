//! In-process [`Store`] for tests and `memory://` local runs.
//!
//! Records live in insertion-ordered vectors behind a single lock.
//! Nothing is persisted across restarts.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use granite_world_core::{
    CustomerQuery, CustomerQueryDetail, CustomerQueryId, CustomerQueryUpdate, GalleryPost,
    GalleryPostId, NewCustomerQuery, NewGalleryPost, NewProduct, Product, ProductId, QueryStatus,
    is_reserved_name,
};

use super::{ProductFilter, RepositoryError, Store};

#[derive(Default)]
struct Collections {
    products: Vec<Product>,
    queries: Vec<CustomerQuery>,
    posts: Vec<GalleryPost>,
}

impl Collections {
    fn detail(&self, query: &CustomerQuery) -> CustomerQueryDetail {
        CustomerQueryDetail {
            query: query.clone(),
            product: self
                .products
                .iter()
                .find(|p| p.id == query.product_id)
                .cloned(),
        }
    }
}

/// Volatile store holding every record in memory.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let inner = self.inner.read().await;
        let limit = filter
            .limit
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));

        Ok(inner
            .products
            .iter()
            .filter(|p| !filter.featured_only || p.featured)
            .filter(|p| {
                filter
                    .hide_general_inquiry
                    .is_none_or(|general| p.id != general && !is_reserved_name(&p.name))
            })
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner.products.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_product(
        &self,
        id: ProductId,
        product: &NewProduct,
    ) -> Result<Product, RepositoryError> {
        let mut inner = self.inner.write().await;
        if inner.products.iter().any(|p| p.id == id) {
            return Err(RepositoryError::Conflict(format!(
                "product {id} already exists"
            )));
        }
        if is_reserved_name(&product.name)
            && let Some(existing) = inner.products.iter().find(|p| is_reserved_name(&p.name))
        {
            return Err(RepositoryError::Conflict(format!(
                "reserved name already used by product {}",
                existing.id
            )));
        }

        let now = Utc::now();
        let record = Product {
            id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            category: product.category.clone(),
            image_url: product.image_url.clone(),
            featured: product.featured,
            created_at: now,
            updated_at: now,
        };
        inner.products.push(record.clone());
        Ok(record)
    }

    async fn update_product(
        &self,
        id: ProductId,
        product: &NewProduct,
    ) -> Result<Option<Product>, RepositoryError> {
        let mut inner = self.inner.write().await;
        let Some(record) = inner.products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        record.name.clone_from(&product.name);
        record.description.clone_from(&product.description);
        record.price = product.price;
        record.category.clone_from(&product.category);
        record.image_url.clone_from(&product.image_url);
        record.featured = product.featured;
        record.updated_at = Utc::now().max(record.updated_at);
        Ok(Some(record.clone()))
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let mut inner = self.inner.write().await;
        let before = inner.products.len();
        inner.products.retain(|p| p.id != id);
        Ok(inner.products.len() < before)
    }

    async fn list_customer_queries(&self) -> Result<Vec<CustomerQueryDetail>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .queries
            .iter()
            .rev()
            .map(|q| inner.detail(q))
            .collect())
    }

    async fn get_customer_query(
        &self,
        id: CustomerQueryId,
    ) -> Result<Option<CustomerQueryDetail>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .queries
            .iter()
            .find(|q| q.id == id)
            .map(|q| inner.detail(q)))
    }

    async fn insert_customer_query(
        &self,
        query: &NewCustomerQuery,
    ) -> Result<CustomerQuery, RepositoryError> {
        let mut inner = self.inner.write().await;
        let now = Utc::now();
        let record = CustomerQuery {
            id: CustomerQueryId::generate(),
            name: query.name.clone(),
            email: query.email.clone(),
            phone: query.phone.clone(),
            message: query.message.clone(),
            product_id: query.product_id,
            status: QueryStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        inner.queries.push(record.clone());
        Ok(record)
    }

    async fn update_customer_query(
        &self,
        id: CustomerQueryId,
        update: &CustomerQueryUpdate,
    ) -> Result<Option<CustomerQuery>, RepositoryError> {
        let mut inner = self.inner.write().await;
        let Some(record) = inner.queries.iter_mut().find(|q| q.id == id) else {
            return Ok(None);
        };

        record.name.clone_from(&update.name);
        record.email = update.email.clone();
        record.phone.clone_from(&update.phone);
        record.message.clone_from(&update.message);
        record.status = update.status;
        record.updated_at = Utc::now().max(record.updated_at);
        Ok(Some(record.clone()))
    }

    async fn delete_customer_query(&self, id: CustomerQueryId) -> Result<bool, RepositoryError> {
        let mut inner = self.inner.write().await;
        let before = inner.queries.len();
        inner.queries.retain(|q| q.id != id);
        Ok(inner.queries.len() < before)
    }

    async fn list_gallery_posts(
        &self,
        featured_only: bool,
    ) -> Result<Vec<GalleryPost>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .posts
            .iter()
            .rev()
            .filter(|p| !featured_only || p.featured)
            .cloned()
            .collect())
    }

    async fn get_gallery_post(
        &self,
        id: GalleryPostId,
    ) -> Result<Option<GalleryPost>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_gallery_post(
        &self,
        post: &NewGalleryPost,
    ) -> Result<GalleryPost, RepositoryError> {
        let mut inner = self.inner.write().await;
        let now = Utc::now();
        let record = GalleryPost {
            id: GalleryPostId::generate(),
            image_url: post.image_url.clone(),
            caption: post.caption.clone(),
            description: post.description.clone(),
            tags: post.tags.clone(),
            likes: 0,
            featured: post.featured,
            created_at: now,
            updated_at: now,
        };
        inner.posts.push(record.clone());
        Ok(record)
    }

    async fn replace_gallery_post(
        &self,
        id: GalleryPostId,
        post: &NewGalleryPost,
    ) -> Result<Option<GalleryPost>, RepositoryError> {
        let mut inner = self.inner.write().await;
        let Some(record) = inner.posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        record.image_url.clone_from(&post.image_url);
        record.caption.clone_from(&post.caption);
        record.description.clone_from(&post.description);
        record.tags.clone_from(&post.tags);
        record.featured = post.featured;
        record.updated_at = Utc::now().max(record.updated_at);
        Ok(Some(record.clone()))
    }

    async fn delete_gallery_post(&self, id: GalleryPostId) -> Result<bool, RepositoryError> {
        let mut inner = self.inner.write().await;
        let before = inner.posts.len();
        inner.posts.retain(|p| p.id != id);
        Ok(inner.posts.len() < before)
    }
}
