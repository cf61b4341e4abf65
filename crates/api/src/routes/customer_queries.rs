//! Customer query endpoints.
//!
//! Submitting a query is public; reading and managing them is admin-only.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use granite_world_core::{
    CustomerQuery, CustomerQueryDetail, CustomerQueryId, CustomerQueryInput, CustomerQueryPatch,
};

use super::MessageResponse;
use crate::error::{ApiJson, ApiPath, AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

const NOT_FOUND: &str = "Customer query not found";

/// `GET /api/customer-queries`
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<CustomerQueryDetail>>> {
    Ok(Json(state.store().list_customer_queries().await?))
}

/// `GET /api/customer-queries/{id}`
#[instrument(skip_all, fields(query_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiPath(id): ApiPath<CustomerQueryId>,
) -> Result<Json<CustomerQueryDetail>> {
    state
        .store()
        .get_customer_query(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(NOT_FOUND))
}

/// `POST /api/customer-queries`
///
/// The referenced product must exist at submission time.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CustomerQueryInput>,
) -> Result<(StatusCode, Json<CustomerQuery>)> {
    let query = input.validate()?;

    if state.store().get_product(query.product_id).await?.is_none() {
        return Err(AppError::BadRequest {
            message: "Referenced product does not exist".to_string(),
            detail: "productId".to_string(),
        });
    }

    let created = state.store().insert_customer_query(&query).await?;
    tracing::info!(
        query_id = %created.id,
        product_id = %created.product_id,
        "Customer query received"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/customer-queries/{id}`
#[instrument(skip_all, fields(query_id = %id, admin = %admin.username))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<CustomerQueryId>,
    ApiJson(patch): ApiJson<CustomerQueryPatch>,
) -> Result<Json<CustomerQuery>> {
    let current = state
        .store()
        .get_customer_query(id)
        .await?
        .ok_or(AppError::NotFound(NOT_FOUND))?;

    let update = patch.apply_to(&current.query)?;
    let updated = state
        .store()
        .update_customer_query(id, &update)
        .await?
        .ok_or(AppError::NotFound(NOT_FOUND))?;

    if updated.status != current.query.status {
        tracing::info!(
            from = %current.query.status,
            to = %updated.status,
            "Customer query status changed"
        );
    }
    Ok(Json(updated))
}

/// `DELETE /api/customer-queries/{id}`
#[instrument(skip_all, fields(query_id = %id, admin = %admin.username))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<CustomerQueryId>,
) -> Result<Json<MessageResponse>> {
    if !state.store().delete_customer_query(id).await? {
        return Err(AppError::NotFound(NOT_FOUND));
    }
    Ok(Json(MessageResponse::new(
        "Customer query deleted successfully",
    )))
}
