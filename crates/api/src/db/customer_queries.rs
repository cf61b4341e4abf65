//! Customer query repository.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use granite_world_core::{
    CustomerQuery, CustomerQueryDetail, CustomerQueryId, CustomerQueryUpdate, Email,
    NewCustomerQuery, ProductId, QueryStatus,
};

use super::RepositoryError;
use super::products::ProductRepository;

const QUERY_COLUMNS: &str =
    "id, name, email, phone, message, product_id, status, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct CustomerQueryRow {
    id: Uuid,
    name: String,
    email: String,
    phone: String,
    message: String,
    product_id: Uuid,
    status: QueryStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CustomerQueryRow> for CustomerQuery {
    type Error = RepositoryError;

    fn try_from(row: CustomerQueryRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: CustomerQueryId::new(row.id),
            name: row.name,
            email,
            phone: row.phone,
            message: row.message,
            product_id: ProductId::new(row.product_id),
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for customer query database operations.
///
/// The product reference is not a foreign key: deleting a product leaves
/// its queries in place with a dangling `product_id`.
pub struct CustomerQueryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerQueryRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all queries newest first with products expanded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self) -> Result<Vec<CustomerQueryDetail>, RepositoryError> {
        let sql = format!(
            "SELECT {QUERY_COLUMNS} FROM customer_queries ORDER BY created_at DESC, id DESC"
        );
        let rows: Vec<CustomerQueryRow> = sqlx::query_as(&sql).fetch_all(self.pool).await?;
        let queries = rows
            .into_iter()
            .map(CustomerQuery::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let mut product_ids: Vec<ProductId> = queries.iter().map(|q| q.product_id).collect();
        product_ids.sort_unstable();
        product_ids.dedup();

        let products: HashMap<_, _> = ProductRepository::new(self.pool)
            .get_many(&product_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(queries
            .into_iter()
            .map(|query| CustomerQueryDetail {
                product: products.get(&query.product_id).cloned(),
                query,
            })
            .collect())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_by_id(
        &self,
        id: CustomerQueryId,
    ) -> Result<Option<CustomerQueryDetail>, RepositoryError> {
        let sql = format!("SELECT {QUERY_COLUMNS} FROM customer_queries WHERE id = $1");
        let row: Option<CustomerQueryRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let query = CustomerQuery::try_from(row)?;
        let product = ProductRepository::new(self.pool)
            .get_by_id(query.product_id)
            .await?;

        Ok(Some(CustomerQueryDetail { query, product }))
    }

    /// Insert a new query with status `pending`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, query: &NewCustomerQuery) -> Result<CustomerQuery, RepositoryError> {
        let sql = format!(
            r"
            INSERT INTO customer_queries (id, name, email, phone, message, product_id, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {QUERY_COLUMNS}
            "
        );

        let row: CustomerQueryRow = sqlx::query_as(&sql)
            .bind(CustomerQueryId::generate())
            .bind(&query.name)
            .bind(query.email.as_str())
            .bind(&query.phone)
            .bind(&query.message)
            .bind(query.product_id)
            .bind(QueryStatus::Pending)
            .fetch_one(self.pool)
            .await?;

        row.try_into()
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: CustomerQueryId,
        update: &CustomerQueryUpdate,
    ) -> Result<Option<CustomerQuery>, RepositoryError> {
        let sql = format!(
            r"
            UPDATE customer_queries
            SET name = $2, email = $3, phone = $4, message = $5, status = $6,
                updated_at = now()
            WHERE id = $1
            RETURNING {QUERY_COLUMNS}
            "
        );

        let row: Option<CustomerQueryRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(&update.name)
            .bind(update.email.as_str())
            .bind(&update.phone)
            .bind(&update.message)
            .bind(update.status)
            .fetch_optional(self.pool)
            .await?;

        row.map(CustomerQuery::try_from).transpose()
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: CustomerQueryId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM customer_queries WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
