//! Product repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use granite_world_core::{GENERAL_INQUIRY_NAME, NewProduct, Price, Product, ProductId};

use super::{ProductFilter, RepositoryError};

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, category, image_url, featured, created_at, updated_at";

/// Partial unique index allowing a single "General Inquiry" row.
const RESERVED_NAME_INDEX: &str = "products_general_inquiry_name_idx";

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    description: String,
    price: Decimal,
    category: String,
    image_url: String,
    featured: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price for product {}: {e}", row.id))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price,
            category: row.category,
            image_url: row.image_url,
            featured: row.featured,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE ($1 = FALSE OR featured)
              AND ($2::uuid IS NULL OR (id <> $2 AND lower(name) <> lower($3)))
            ORDER BY created_at, id
            LIMIT $4
            "
        );

        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(filter.featured_only)
            .bind(filter.hide_general_inquiry)
            .bind(GENERAL_INQUIRY_NAME)
            .bind(filter.limit.map(i64::from))
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    /// Fetch every product whose ID is in `ids`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let ids: Vec<Uuid> = ids.iter().map(ProductId::as_uuid).collect();
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)");
        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(ids)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the ID or the reserved name is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        id: ProductId,
        product: &NewProduct,
    ) -> Result<Product, RepositoryError> {
        let sql = format!(
            r"
            INSERT INTO products (id, name, description, price, category, image_url, featured)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PRODUCT_COLUMNS}
            "
        );

        let row: ProductRow = sqlx::query_as(&sql)
            .bind(id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(&product.category)
            .bind(&product.image_url)
            .bind(product.featured)
            .fetch_one(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    if db_err.constraint() == Some(RESERVED_NAME_INDEX) {
                        return RepositoryError::Conflict(
                            "reserved name already used by another product".to_string(),
                        );
                    }
                    return RepositoryError::Conflict(format!("product {id} already exists"));
                }
                RepositoryError::Database(e)
            })?;

        row.try_into()
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: ProductId,
        product: &NewProduct,
    ) -> Result<Option<Product>, RepositoryError> {
        let sql = format!(
            r"
            UPDATE products
            SET name = $2, description = $3, price = $4, category = $5,
                image_url = $6, featured = $7, updated_at = now()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        );

        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(&product.category)
            .bind(&product.image_url)
            .bind(product.featured)
            .fetch_optional(self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
