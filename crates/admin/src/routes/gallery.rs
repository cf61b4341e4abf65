//! Gallery post management.

use askama::Template;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use granite_world_client::ClientError;
use granite_world_core::{GalleryPost, GalleryPostId, GalleryPostInput, parse_tags};

use super::{delete_outcome, parse_id, render};
use crate::error::Result;
use crate::filters;
use crate::middleware::{RequireAdminAuth, set_flash, take_flash};
use crate::models::Flash;
use crate::state::AppState;

/// Gallery form as posted. Tags are a single comma-separated field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GalleryForm {
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: String,
    pub featured: Option<String>,
}

impl GalleryForm {
    #[must_use]
    pub fn to_input(&self) -> GalleryPostInput {
        GalleryPostInput {
            image_url: self.image_url.clone(),
            caption: self.caption.clone(),
            description: self.description.clone(),
            tags: parse_tags(&self.tags),
            featured: self.featured.is_some(),
        }
    }
}

impl From<&GalleryPost> for GalleryForm {
    fn from(post: &GalleryPost) -> Self {
        Self {
            image_url: post.image_url.clone(),
            caption: post.caption.clone(),
            description: post.description.clone(),
            tags: post.tags_csv(),
            featured: post.featured.then(|| "on".to_string()),
        }
    }
}

#[derive(Template)]
#[template(path = "gallery/index.html")]
pub struct GalleryIndexTemplate {
    pub username: String,
    pub flash: Option<Flash>,
    pub posts: Vec<GalleryPost>,
}

#[derive(Template)]
#[template(path = "gallery/form.html")]
pub struct GalleryFormTemplate {
    pub username: String,
    pub title: String,
    pub action: String,
    pub form: GalleryForm,
    pub error: Option<String>,
}

fn form_page(
    status: StatusCode,
    username: String,
    title: String,
    action: String,
    form: GalleryForm,
    error: Option<String>,
) -> Result<Response> {
    let page = render(&GalleryFormTemplate {
        username,
        title,
        action,
        form,
        error,
    })?;
    Ok((status, page).into_response())
}

/// GET /gallery
#[instrument(skip_all)]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>> {
    let posts = state.api().list_gallery_posts().await?;

    render(&GalleryIndexTemplate {
        username: admin.username,
        flash: take_flash(&session).await,
        posts,
    })
}

/// GET /gallery/new
pub async fn new(RequireAdminAuth(admin): RequireAdminAuth) -> Result<Response> {
    form_page(
        StatusCode::OK,
        admin.username,
        "New gallery post".to_string(),
        "/gallery".to_string(),
        GalleryForm::default(),
        None,
    )
}

/// POST /gallery
#[instrument(skip_all, fields(caption = %form.caption))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<GalleryForm>,
) -> Result<Response> {
    match state
        .api()
        .admin(&admin.token)
        .create_gallery_post(&form.to_input())
        .await
    {
        Ok(post) => {
            tracing::info!(id = %post.id, "Gallery post created");
            set_flash(&session, Flash::success(format!("Posted \"{}\"", post.caption))).await?;
            Ok(Redirect::to("/gallery").into_response())
        }
        Err(ClientError::Validation(message)) => form_page(
            StatusCode::UNPROCESSABLE_ENTITY,
            admin.username,
            "New gallery post".to_string(),
            "/gallery".to_string(),
            form,
            Some(message),
        ),
        Err(e) => Err(e.into()),
    }
}

/// GET /gallery/{id}/edit
pub async fn edit(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let id: GalleryPostId = parse_id(&id, "gallery post")?;
    let post = state.api().get_gallery_post(id).await?;

    form_page(
        StatusCode::OK,
        admin.username,
        format!("Edit {}", post.caption),
        format!("/gallery/{id}"),
        GalleryForm::from(&post),
        None,
    )
}

/// POST /gallery/{id}
#[instrument(skip_all, fields(post_id = %id))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<GalleryForm>,
) -> Result<Response> {
    let post_id: GalleryPostId = parse_id(&id, "gallery post")?;

    match state
        .api()
        .admin(&admin.token)
        .update_gallery_post(post_id, &form.to_input())
        .await
    {
        Ok(post) => {
            tracing::info!("Gallery post updated");
            set_flash(&session, Flash::success(format!("Saved \"{}\"", post.caption))).await?;
            Ok(Redirect::to("/gallery").into_response())
        }
        Err(ClientError::Validation(message)) => form_page(
            StatusCode::UNPROCESSABLE_ENTITY,
            admin.username,
            format!("Edit {}", form.caption),
            format!("/gallery/{post_id}"),
            form,
            Some(message),
        ),
        Err(e) => Err(e.into()),
    }
}

/// POST /gallery/{id}/delete
#[instrument(skip_all, fields(post_id = %id))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let post_id: GalleryPostId = parse_id(&id, "gallery post")?;
    let result = state
        .api()
        .admin(&admin.token)
        .delete_gallery_post(post_id)
        .await;

    let flash = delete_outcome(result, "Gallery post not found")?;
    set_flash(&session, flash).await?;
    Ok(Redirect::to("/gallery"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_to_input_splits_tags() {
        let form = GalleryForm {
            image_url: "https://img.example/island.jpg".into(),
            caption: "Island".into(),
            description: String::new(),
            tags: " kitchen, ,black granite ,".into(),
            featured: None,
        };
        let input = form.to_input();
        assert_eq!(input.tags, vec!["kitchen", "black granite"]);
        assert!(!input.featured);
    }
}
