//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Health check
//!
//! # Auth
//! GET  /auth/login                - Login page
//! POST /auth/login                - Exchange credentials for an API token
//! POST /auth/logout               - Revoke token and clear session
//!
//! # Dashboard
//! GET  /                          - Counts and latest inquiries
//!
//! # Products
//! GET  /products?q=               - Product listing
//! GET  /products/new              - New product form
//! POST /products                  - Create product
//! GET  /products/{id}/edit        - Edit form
//! POST /products/{id}             - Update product
//! POST /products/{id}/delete      - Delete product
//!
//! # Inquiries
//! GET  /inquiries?status=         - Customer query listing
//! GET  /inquiries/{id}            - Query detail
//! POST /inquiries/{id}/status     - Change status
//! POST /inquiries/{id}/delete     - Delete query
//!
//! # Gallery
//! GET  /gallery                   - Gallery listing
//! GET  /gallery/new               - New post form
//! POST /gallery                   - Create post
//! GET  /gallery/{id}/edit         - Edit form
//! POST /gallery/{id}              - Replace post
//! POST /gallery/{id}/delete       - Delete post
//! ```
//!
//! Every route except `/auth/*` and `/health` requires `RequireAdminAuth`.

pub mod auth;
pub mod dashboard;
pub mod gallery;
pub mod inquiries;
pub mod products;

use askama::Template;
use axum::{
    Router,
    response::Html,
    routing::{get, post},
};

use granite_world_client::ClientError;

use crate::error::{AppError, Result};
use crate::models::Flash;
use crate::state::AppState;

/// Render a template into an HTML response.
pub(crate) fn render<T: Template>(template: &T) -> Result<Html<String>> {
    Ok(Html(template.render()?))
}

/// Parse a path id, treating garbage as a missing resource.
pub(crate) fn parse_id<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("{what} {raw}")))
}

/// Turn the outcome of an API delete into a flash message.
///
/// Not-found and rejected deletes become error flashes; anything else
/// (including an expired token) propagates.
pub(crate) fn delete_outcome(
    result: std::result::Result<String, ClientError>,
    not_found: &str,
) -> Result<Flash> {
    match result {
        Ok(message) => Ok(Flash::success(message)),
        Err(ClientError::NotFound(_)) => Ok(Flash::error(not_found)),
        Err(ClientError::Validation(message)) => Ok(Flash::error(message)),
        Err(e) => Err(e.into()),
    }
}

/// Create all routes for admin.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(auth::login_page).post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/", get(dashboard::dashboard))
        .route("/products", get(products::index).post(products::create))
        .route("/products/new", get(products::new))
        .route("/products/{id}", post(products::update))
        .route("/products/{id}/edit", get(products::edit))
        .route("/products/{id}/delete", post(products::delete))
        .route("/inquiries", get(inquiries::index))
        .route("/inquiries/{id}", get(inquiries::show))
        .route("/inquiries/{id}/status", post(inquiries::update_status))
        .route("/inquiries/{id}/delete", post(inquiries::delete))
        .route("/gallery", get(gallery::index).post(gallery::create))
        .route("/gallery/new", get(gallery::new))
        .route("/gallery/{id}", post(gallery::update))
        .route("/gallery/{id}/edit", get(gallery::edit))
        .route("/gallery/{id}/delete", post(gallery::delete))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_outcome() {
        let flash = delete_outcome(Ok("Product deleted successfully".into()), "missing").unwrap_or_else(|_| Flash::error("x"));
        assert!(flash.success);

        let flash = delete_outcome(Err(ClientError::NotFound("gone".into())), "Product not found")
            .unwrap_or_else(|_| Flash::error("x"));
        assert_eq!(flash, Flash::error("Product not found"));

        let flash = delete_outcome(
            Err(ClientError::Validation("Cannot delete the General Inquiry product".into())),
            "missing",
        )
        .unwrap_or_else(|_| Flash::error("x"));
        assert_eq!(flash.message, "Cannot delete the General Inquiry product");

        assert!(delete_outcome(Err(ClientError::Unauthorized("expired".into())), "missing").is_err());
    }
}
