//! Gallery handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use granite_world_core::{GalleryPost, GalleryPostId};

use crate::catalogue::{self, Chip, GalleryFilter};
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Gallery query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct GalleryQuery {
    pub filter: Option<String>,
    pub q: Option<String>,
}

/// Gallery listing template.
#[derive(Template, WebTemplate)]
#[template(path = "gallery/index.html")]
pub struct GalleryIndexTemplate {
    pub posts: Vec<GalleryPost>,
    pub chips: Vec<Chip>,
    pub query: String,
    pub filter: String,
}

/// Gallery post detail template.
#[derive(Template, WebTemplate)]
#[template(path = "gallery/show.html")]
pub struct GalleryShowTemplate {
    pub post: GalleryPost,
}

/// Display the gallery.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<GalleryQuery>,
) -> Result<impl IntoResponse> {
    let filter = GalleryFilter::parse(params.filter.as_deref());
    let query = catalogue::non_blank(params.q.as_deref());

    let fetched = match filter {
        GalleryFilter::Featured => state.api().featured_gallery_posts().await?,
        _ => state.api().list_gallery_posts().await?,
    };
    let chips = catalogue::gallery_chips(&catalogue::gallery_tags(&fetched), &filter, query);
    let posts = catalogue::filter_gallery(fetched, &filter, query);

    Ok(GalleryIndexTemplate {
        posts,
        chips,
        query: query.unwrap_or_default().to_string(),
        filter: filter.as_param().unwrap_or_default().to_string(),
    })
}

/// Display a single gallery post.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<impl IntoResponse> {
    let id: GalleryPostId = id
        .parse()
        .map_err(|_| AppError::NotFound(format!("gallery post {id}")))?;
    let post = state.api().get_gallery_post(id).await?;
    Ok(GalleryShowTemplate { post })
}
