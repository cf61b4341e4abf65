//! Product endpoints.
//!
//! Listings never include the "General Inquiry" sentinel; it is only
//! reachable through `/products/general` and by ID.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use tracing::instrument;

use granite_world_core::{Product, ProductId, ProductInput, ProductPatch};

use super::MessageResponse;
use crate::db::ProductFilter;
use crate::error::{ApiJson, ApiPath, AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Maximum number of products on the featured shelf.
pub const FEATURED_LIMIT: u32 = 5;

const NOT_FOUND: &str = "Product not found";

/// `GET /api/products`
#[instrument(skip_all)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = state
        .store()
        .list_products(ProductFilter {
            hide_general_inquiry: Some(state.general_inquiry_id()),
            ..ProductFilter::default()
        })
        .await?;
    Ok(Json(products))
}

/// `GET /api/products/featured`
#[instrument(skip_all)]
pub async fn featured(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = state
        .store()
        .list_products(ProductFilter {
            featured_only: true,
            hide_general_inquiry: Some(state.general_inquiry_id()),
            limit: Some(FEATURED_LIMIT),
        })
        .await?;
    Ok(Json(products))
}

/// `GET /api/products/general`
#[instrument(skip_all)]
pub async fn general(State(state): State<AppState>) -> Result<Json<Product>> {
    state
        .store()
        .get_product(state.general_inquiry_id())
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("General product not found"))
}

/// `GET /api/products/{id}`
#[instrument(skip_all, fields(product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<Product>> {
    state
        .store()
        .get_product(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(NOT_FOUND))
}

/// `POST /api/products`
#[instrument(skip_all, fields(admin = %admin.username))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiJson(input): ApiJson<ProductInput>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = input.validate()?;
    product.ensure_unreserved_name()?;

    let created = state
        .store()
        .insert_product(ProductId::generate(), &product)
        .await?;
    tracing::info!(product_id = %created.id, "Product created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/products/{id}`
#[instrument(skip_all, fields(product_id = %id, admin = %admin.username))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<ProductId>,
    ApiJson(patch): ApiJson<ProductPatch>,
) -> Result<Json<Product>> {
    let current = state
        .store()
        .get_product(id)
        .await?
        .ok_or(AppError::NotFound(NOT_FOUND))?;

    let product = patch.apply_to(&current)?;
    if id != state.general_inquiry_id() {
        product.ensure_unreserved_name()?;
    }

    state
        .store()
        .update_product(id, &product)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(NOT_FOUND))
}

/// `DELETE /api/products/{id}`
///
/// Customer queries referencing the product are left in place.
#[instrument(skip_all, fields(product_id = %id, admin = %admin.username))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<MessageResponse>> {
    if id == state.general_inquiry_id() {
        return Err(AppError::BadRequest {
            message: "The General Inquiry product cannot be deleted".to_string(),
            detail: "reserved".to_string(),
        });
    }

    if !state.store().delete_product(id).await? {
        return Err(AppError::NotFound(NOT_FOUND));
    }
    tracing::info!("Product deleted");
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}
