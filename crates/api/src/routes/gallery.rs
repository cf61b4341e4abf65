//! Gallery post endpoints.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use granite_world_core::{GalleryPost, GalleryPostId, GalleryPostInput};

use super::MessageResponse;
use crate::error::{ApiJson, ApiPath, AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

const NOT_FOUND: &str = "Gallery post not found";

/// `GET /api/gallery`
#[instrument(skip_all)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<GalleryPost>>> {
    Ok(Json(state.store().list_gallery_posts(false).await?))
}

/// `GET /api/gallery/featured`
#[instrument(skip_all)]
pub async fn featured(State(state): State<AppState>) -> Result<Json<Vec<GalleryPost>>> {
    Ok(Json(state.store().list_gallery_posts(true).await?))
}

/// `GET /api/gallery/{id}`
#[instrument(skip_all, fields(post_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<GalleryPostId>,
) -> Result<Json<GalleryPost>> {
    state
        .store()
        .get_gallery_post(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(NOT_FOUND))
}

/// `POST /api/gallery`
#[instrument(skip_all, fields(admin = %admin.username))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiJson(input): ApiJson<GalleryPostInput>,
) -> Result<(StatusCode, Json<GalleryPost>)> {
    let post = input.validate()?;
    let created = state.store().insert_gallery_post(&post).await?;
    tracing::info!(post_id = %created.id, "Gallery post created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/gallery/{id}`
///
/// Replaces image, caption, description, tags and featured flag.
#[instrument(skip_all, fields(post_id = %id, admin = %admin.username))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<GalleryPostId>,
    ApiJson(input): ApiJson<GalleryPostInput>,
) -> Result<Json<GalleryPost>> {
    let post = input.validate()?;
    state
        .store()
        .replace_gallery_post(id, &post)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(NOT_FOUND))
}

/// `DELETE /api/gallery/{id}`
#[instrument(skip_all, fields(post_id = %id, admin = %admin.username))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<GalleryPostId>,
) -> Result<Json<MessageResponse>> {
    if !state.store().delete_gallery_post(id).await? {
        return Err(AppError::NotFound(NOT_FOUND));
    }
    tracing::info!("Gallery post deleted");
    Ok(Json(MessageResponse::new("Gallery post deleted successfully")))
}
