//! Gallery post repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use granite_world_core::{GalleryPost, GalleryPostId, NewGalleryPost};

use super::RepositoryError;

const POST_COLUMNS: &str =
    "id, image_url, caption, description, tags, likes, featured, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct GalleryPostRow {
    id: Uuid,
    image_url: String,
    caption: String,
    description: String,
    tags: Vec<String>,
    likes: i32,
    featured: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<GalleryPostRow> for GalleryPost {
    fn from(row: GalleryPostRow) -> Self {
        Self {
            id: GalleryPostId::new(row.id),
            image_url: row.image_url,
            caption: row.caption,
            description: row.description,
            tags: row.tags,
            likes: row.likes,
            featured: row.featured,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for gallery post database operations.
pub struct GalleryPostRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> GalleryPostRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List posts newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, featured_only: bool) -> Result<Vec<GalleryPost>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {POST_COLUMNS}
            FROM gallery_posts
            WHERE ($1 = FALSE OR featured)
            ORDER BY created_at DESC, id DESC
            "
        );
        let rows: Vec<GalleryPostRow> = sqlx::query_as(&sql)
            .bind(featured_only)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(GalleryPost::from).collect())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: GalleryPostId) -> Result<Option<GalleryPost>, RepositoryError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM gallery_posts WHERE id = $1");
        let row: Option<GalleryPostRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(GalleryPost::from))
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, post: &NewGalleryPost) -> Result<GalleryPost, RepositoryError> {
        let sql = format!(
            r"
            INSERT INTO gallery_posts (id, image_url, caption, description, tags, featured)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {POST_COLUMNS}
            "
        );
        let row: GalleryPostRow = sqlx::query_as(&sql)
            .bind(GalleryPostId::generate())
            .bind(&post.image_url)
            .bind(&post.caption)
            .bind(&post.description)
            .bind(&post.tags)
            .bind(post.featured)
            .fetch_one(self.pool)
            .await?;

        Ok(row.into())
    }

    /// Overwrite the writable fields, keeping `likes`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn replace(
        &self,
        id: GalleryPostId,
        post: &NewGalleryPost,
    ) -> Result<Option<GalleryPost>, RepositoryError> {
        let sql = format!(
            r"
            UPDATE gallery_posts
            SET image_url = $2, caption = $3, description = $4, tags = $5, featured = $6,
                updated_at = now()
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "
        );
        let row: Option<GalleryPostRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(&post.image_url)
            .bind(&post.caption)
            .bind(&post.description)
            .bind(&post.tags)
            .bind(post.featured)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(GalleryPost::from))
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: GalleryPostId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM gallery_posts WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
