//! Dashboard route handler.

use askama::Template;
use axum::{extract::State, response::Html};
use tower_sessions::Session;
use tracing::instrument;

use granite_world_core::{CustomerQueryDetail, QueryStatus};

use super::inquiries::InquiryRow;
use super::render;
use crate::error::Result;
use crate::filters;
use crate::middleware::{RequireAdminAuth, take_flash};
use crate::models::Flash;
use crate::state::AppState;

/// Number of inquiries shown on the dashboard.
const RECENT_INQUIRIES: usize = 5;

/// Inquiry count for one status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCount {
    pub label: &'static str,
    pub status: &'static str,
    pub count: usize,
}

/// Count inquiries per status, in display order.
#[must_use]
pub fn status_counts(queries: &[CustomerQueryDetail]) -> Vec<StatusCount> {
    QueryStatus::ALL
        .iter()
        .map(|&status| StatusCount {
            label: status.label(),
            status: status.as_str(),
            count: queries.iter().filter(|q| q.query.status == status).count(),
        })
        .collect()
}

/// Dashboard template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub username: String,
    pub flash: Option<Flash>,
    pub product_count: usize,
    pub gallery_count: usize,
    pub inquiry_count: usize,
    pub status_counts: Vec<StatusCount>,
    /// Most recent inquiries, newest first.
    pub rows: Vec<InquiryRow>,
}

/// Dashboard page handler.
#[instrument(skip_all)]
pub async fn dashboard(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>> {
    let api = state.api();
    let admin_api = api.admin(&admin.token);

    let (products, queries, posts) = tokio::try_join!(
        api.list_products(),
        admin_api.list_queries(),
        api.list_gallery_posts(),
    )?;

    render(&DashboardTemplate {
        username: admin.username,
        flash: take_flash(&session).await,
        product_count: products.len(),
        gallery_count: posts.len(),
        inquiry_count: queries.len(),
        status_counts: status_counts(&queries),
        rows: queries
            .iter()
            .take(RECENT_INQUIRIES)
            .map(InquiryRow::from)
            .collect(),
    })
}
