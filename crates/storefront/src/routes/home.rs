//! Home page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use granite_world_core::{GalleryPost, Product};

use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub products: Vec<Product>,
    pub posts: Vec<GalleryPost>,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let (products, posts) = tokio::try_join!(
        state.api().featured_products(),
        state.api().featured_gallery_posts(),
    )?;

    Ok(HomeTemplate { products, posts })
}
