//! Catalogue and product detail handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use granite_world_core::{Product, ProductId};

use super::contact::{InquiryForm, Notice, submit_inquiry};
use crate::catalogue::{self, Chip};
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Catalogue query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogueQuery {
    pub q: Option<String>,
    pub category: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<Product>,
    pub chips: Vec<Chip>,
    pub query: String,
    pub category: String,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: Product,
    pub form: InquiryForm,
    pub notice: Option<Notice>,
}

fn parse_id(raw: &str) -> Result<ProductId> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("product {raw}")))
}

/// Display product listing page.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<CatalogueQuery>,
) -> Result<impl IntoResponse> {
    let query = catalogue::non_blank(params.q.as_deref());
    let category = catalogue::non_blank(params.category.as_deref());

    let all = state.api().list_products().await?;
    let chips = catalogue::category_chips(&catalogue::categories(&all), category, query);
    let products = catalogue::filter_products(all, query, category);

    Ok(ProductsIndexTemplate {
        products,
        chips,
        query: query.unwrap_or_default().to_string(),
        category: category.unwrap_or_default().to_string(),
    })
}

/// Display product detail page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<impl IntoResponse> {
    let product = state.api().get_product(parse_id(&id)?).await?;
    Ok(ProductShowTemplate {
        product,
        form: InquiryForm::default(),
        notice: None,
    })
}

/// Submit an inquiry about a product.
#[instrument(skip(state, form))]
pub async fn inquiry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<InquiryForm>,
) -> Result<impl IntoResponse> {
    let product = state.api().get_product(parse_id(&id)?).await?;
    let (notice, form) = submit_inquiry(&state, product.id, form).await;
    Ok(ProductShowTemplate {
        product,
        form,
        notice: Some(notice),
    })
}
