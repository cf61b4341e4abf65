//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page (featured products and gallery)
//! GET  /health                  - Health check
//!
//! GET  /products?q=&category=   - Catalogue
//! GET  /products/{id}           - Product detail with inquiry form
//! POST /products/{id}/inquiry   - Submit a product inquiry
//!
//! GET  /gallery?filter=&q=      - Gallery (filter: all | featured | <tag>)
//! GET  /gallery/{id}            - Gallery post detail
//!
//! GET  /about                   - About page
//! GET  /contact                 - Contact form
//! POST /contact                 - Submit a general inquiry
//! ```

pub mod contact;
pub mod gallery;
pub mod home;
pub mod pages;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
        .route("/{id}/inquiry", post(products::inquiry))
}

/// Create the gallery routes router.
pub fn gallery_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(gallery::index))
        .route("/{id}", get(gallery::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", product_routes())
        .nest("/gallery", gallery_routes())
        .route("/about", get(pages::about))
        .route("/contact", get(contact::show).post(contact::submit))
}
