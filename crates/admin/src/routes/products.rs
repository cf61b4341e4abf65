//! Product management.

use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use granite_world_client::ClientError;
use granite_world_core::{Price, Product, ProductId, ProductInput, ProductPatch};

use super::{delete_outcome, parse_id, render};
use crate::error::Result;
use crate::filters;
use crate::middleware::{RequireAdminAuth, set_flash, take_flash};
use crate::models::Flash;
use crate::state::AppState;

// =============================================================================
// Form
// =============================================================================

/// Product form as posted by the browser. The price stays text until
/// submit so a bad value can be shown back to the user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image_url: String,
    /// Checkbox: present when ticked.
    pub featured: Option<String>,
}

impl ProductForm {
    #[must_use]
    pub const fn is_featured(&self) -> bool {
        self.featured.is_some()
    }

    /// Parse the price field.
    ///
    /// # Errors
    ///
    /// Returns a user-facing message for a blank, malformed or out-of-range price.
    pub fn price(&self) -> std::result::Result<Price, String> {
        let raw = self.price.trim();
        if raw.is_empty() {
            return Err("price is required".to_string());
        }
        let amount: Decimal = raw
            .parse()
            .map_err(|_| format!("price must be a number, got \"{raw}\""))?;
        Price::new(amount).map_err(|e| e.to_string())
    }

    /// Build the API create payload.
    ///
    /// # Errors
    ///
    /// Returns a user-facing message if the price is invalid.
    pub fn to_input(&self) -> std::result::Result<ProductInput, String> {
        Ok(ProductInput {
            name: self.name.clone(),
            description: self.description.clone(),
            price: Some(self.price()?),
            category: self.category.clone(),
            image_url: self.image_url.clone(),
            featured: self.is_featured(),
        })
    }

    /// Build a patch that sets every editable field.
    ///
    /// # Errors
    ///
    /// Returns a user-facing message if the price is invalid.
    pub fn to_patch(&self) -> std::result::Result<ProductPatch, String> {
        Ok(ProductPatch {
            name: Some(self.name.clone()),
            description: Some(self.description.clone()),
            price: Some(self.price()?),
            category: Some(self.category.clone()),
            image_url: Some(self.image_url.clone()),
            featured: Some(self.is_featured()),
        })
    }
}

impl From<&Product> for ProductForm {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.display(),
            category: product.category.clone(),
            image_url: product.image_url.clone(),
            featured: product.featured.then(|| "on".to_string()),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

#[derive(Template)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub username: String,
    pub flash: Option<Flash>,
    pub products: Vec<Product>,
    pub query: String,
}

/// Shared by the new and edit pages. `action` is the form target.
#[derive(Template)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub username: String,
    pub title: String,
    pub action: String,
    pub form: ProductForm,
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    pub q: Option<String>,
}

fn form_page(
    status: StatusCode,
    username: String,
    title: String,
    action: String,
    form: ProductForm,
    error: Option<String>,
) -> Result<Response> {
    let page = render(&ProductFormTemplate {
        username,
        title,
        action,
        form,
        error,
    })?;
    Ok((status, page).into_response())
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /products
#[instrument(skip_all)]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ProductsQuery>,
) -> Result<Html<String>> {
    let search = query.q.unwrap_or_default();
    let term = search.trim();

    let products = state
        .api()
        .list_products()
        .await?
        .into_iter()
        .filter(|p| term.is_empty() || p.matches_search(term))
        .collect();

    render(&ProductsIndexTemplate {
        username: admin.username,
        flash: take_flash(&session).await,
        products,
        query: search,
    })
}

/// GET /products/new
pub async fn new(RequireAdminAuth(admin): RequireAdminAuth) -> Result<Response> {
    form_page(
        StatusCode::OK,
        admin.username,
        "New product".to_string(),
        "/products".to_string(),
        ProductForm::default(),
        None,
    )
}

/// POST /products
#[instrument(skip_all, fields(name = %form.name))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let title = "New product".to_string();
    let action = "/products".to_string();

    let input = match form.to_input() {
        Ok(input) => input,
        Err(message) => {
            return form_page(StatusCode::UNPROCESSABLE_ENTITY, admin.username, title, action, form, Some(message));
        }
    };

    match state.api().admin(&admin.token).create_product(&input).await {
        Ok(product) => {
            tracing::info!(id = %product.id, "Product created");
            set_flash(&session, Flash::success(format!("Created \"{}\"", product.name))).await?;
            Ok(Redirect::to("/products").into_response())
        }
        Err(ClientError::Validation(message)) => {
            form_page(StatusCode::UNPROCESSABLE_ENTITY, admin.username, title, action, form, Some(message))
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /products/{id}/edit
pub async fn edit(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let id: ProductId = parse_id(&id, "product")?;
    let product = state.api().get_product(id).await?;

    form_page(
        StatusCode::OK,
        admin.username,
        format!("Edit {}", product.name),
        format!("/products/{id}"),
        ProductForm::from(&product),
        None,
    )
}

/// POST /products/{id}
#[instrument(skip_all, fields(product_id = %id))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let product_id: ProductId = parse_id(&id, "product")?;
    let title = format!("Edit {}", form.name);
    let action = format!("/products/{product_id}");

    let patch = match form.to_patch() {
        Ok(patch) => patch,
        Err(message) => {
            return form_page(StatusCode::UNPROCESSABLE_ENTITY, admin.username, title, action, form, Some(message));
        }
    };

    match state
        .api()
        .admin(&admin.token)
        .update_product(product_id, &patch)
        .await
    {
        Ok(product) => {
            tracing::info!("Product updated");
            set_flash(&session, Flash::success(format!("Saved \"{}\"", product.name))).await?;
            Ok(Redirect::to("/products").into_response())
        }
        Err(ClientError::Validation(message)) => {
            form_page(StatusCode::UNPROCESSABLE_ENTITY, admin.username, title, action, form, Some(message))
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /products/{id}/delete
#[instrument(skip_all, fields(product_id = %id))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let product_id: ProductId = parse_id(&id, "product")?;
    let result = state
        .api()
        .admin(&admin.token)
        .delete_product(product_id)
        .await;

    let flash = delete_outcome(result, "Product not found")?;
    set_flash(&session, flash).await?;
    Ok(Redirect::to("/products"))
}
