//! Customer query management.

use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{Html, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use granite_world_core::{CustomerQueryDetail, CustomerQueryId, CustomerQueryPatch, QueryStatus};

use super::dashboard::{StatusCount, status_counts};
use super::{delete_outcome, parse_id, render};
use crate::error::Result;
use crate::filters;
use crate::middleware::{RequireAdminAuth, set_flash, take_flash};
use crate::models::Flash;
use crate::state::AppState;

/// Shown in place of a product that has since been deleted.
const PRODUCT_UNAVAILABLE: &str = "Product unavailable";

/// A customer query flattened for table display.
#[derive(Debug, Clone)]
pub struct InquiryRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub product: String,
    pub status: QueryStatus,
    pub received: String,
}

impl From<&CustomerQueryDetail> for InquiryRow {
    fn from(detail: &CustomerQueryDetail) -> Self {
        let query = &detail.query;
        Self {
            id: query.id.to_string(),
            name: query.name.clone(),
            email: query.email.to_string(),
            phone: query.phone.clone(),
            message: query.message.clone(),
            product: detail
                .product
                .as_ref()
                .map_or_else(|| PRODUCT_UNAVAILABLE.to_string(), |p| p.name.clone()),
            status: query.status,
            received: query.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "inquiries/index.html")]
pub struct InquiriesIndexTemplate {
    pub username: String,
    pub flash: Option<Flash>,
    pub rows: Vec<InquiryRow>,
    pub counts: Vec<StatusCount>,
    pub total: usize,
    pub active: Option<&'static str>,
}

#[derive(Template)]
#[template(path = "inquiries/show.html")]
pub struct InquiryShowTemplate {
    pub username: String,
    pub flash: Option<Flash>,
    pub row: InquiryRow,
    pub statuses: [QueryStatus; 3],
}

#[derive(Debug, Default, Deserialize)]
pub struct InquiriesQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

/// GET /inquiries
#[instrument(skip_all)]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<InquiriesQuery>,
) -> Result<Html<String>> {
    let active: Option<QueryStatus> = query.status.as_deref().and_then(|s| s.parse().ok());
    let queries = state.api().admin(&admin.token).list_queries().await?;

    let rows = queries
        .iter()
        .filter(|q| active.is_none_or(|status| q.query.status == status))
        .map(InquiryRow::from)
        .collect();

    render(&InquiriesIndexTemplate {
        username: admin.username,
        flash: take_flash(&session).await,
        rows,
        counts: status_counts(&queries),
        total: queries.len(),
        active: active.map(QueryStatus::as_str),
    })
}

/// GET /inquiries/{id}
pub async fn show(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Html<String>> {
    let id: CustomerQueryId = parse_id(&id, "inquiry")?;
    let detail = state.api().admin(&admin.token).get_query(id).await?;

    render(&InquiryShowTemplate {
        username: admin.username,
        flash: take_flash(&session).await,
        row: InquiryRow::from(&detail),
        statuses: QueryStatus::ALL,
    })
}

/// POST /inquiries/{id}/status
#[instrument(skip_all, fields(query_id = %id, status = %form.status))]
pub async fn update_status(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect> {
    let query_id: CustomerQueryId = parse_id(&id, "inquiry")?;
    let back = Redirect::to(&format!("/inquiries/{query_id}"));

    let Ok(status) = form.status.parse::<QueryStatus>() else {
        set_flash(&session, Flash::error(format!("Unknown status \"{}\"", form.status))).await?;
        return Ok(back);
    };

    state
        .api()
        .admin(&admin.token)
        .update_query(query_id, &CustomerQueryPatch::status(status))
        .await?;

    tracing::info!("Inquiry status changed");
    set_flash(&session, Flash::success(format!("Marked as {}", status.label()))).await?;
    Ok(back)
}

/// POST /inquiries/{id}/delete
#[instrument(skip_all, fields(query_id = %id))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let query_id: CustomerQueryId = parse_id(&id, "inquiry")?;
    let result = state.api().admin(&admin.token).delete_query(query_id).await;

    let flash = delete_outcome(result, "Inquiry not found")?;
    set_flash(&session, flash).await?;
    Ok(Redirect::to("/inquiries"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::Utc;
    use granite_world_core::{CustomerQuery, Email, Price, Product, ProductId};

    use super::*;

    fn detail(product: Option<Product>) -> CustomerQueryDetail {
        let now = Utc::now();
        CustomerQueryDetail {
            query: CustomerQuery {
                id: CustomerQueryId::generate(),
                name: "Jane".into(),
                email: Email::parse("jane@example.com").unwrap(),
                phone: "555-0100".into(),
                message: "Do you cut to size?".into(),
                product_id: ProductId::generate(),
                status: QueryStatus::Responded,
                created_at: now,
                updated_at: now,
            },
            product,
        }
    }

    #[test]
    fn test_row_for_deleted_product() {
        let row = InquiryRow::from(&detail(None));
        assert_eq!(row.product, "Product unavailable");
        assert_eq!(row.email, "jane@example.com");
        assert_eq!(row.status, QueryStatus::Responded);
    }

    #[test]
    fn test_row_with_product_and_counts() {
        let now = Utc::now();
        let product = Product {
            id: ProductId::generate(),
            name: "Kashmir White".into(),
            description: "Speckled".into(),
            price: Price::ZERO,
            category: "Slabs".into(),
            image_url: String::new(),
            featured: false,
            created_at: now,
            updated_at: now,
        };
        let details = vec![detail(Some(product)), detail(None)];
        assert_eq!(InquiryRow::from(&details[0]).product, "Kashmir White");

        let counts = status_counts(&details);
        let responded = counts.iter().find(|c| c.status == "responded").unwrap();
        assert_eq!(responded.count, 2);
        assert!(counts.iter().filter(|c| c.status != "responded").all(|c| c.count == 0));
    }
}
