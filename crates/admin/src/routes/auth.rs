//! Login and logout.
//!
//! Credentials are checked by the API; on success the issued bearer token is
//! kept in the server-side session and never reaches the browser.

use askama::Template;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use granite_world_client::ClientError;

use super::render;
use crate::error::Result;
use crate::filters;
use crate::middleware::{clear_current_admin, set_current_admin};
use crate::models::session::StoredAdmin;
use crate::models::{CurrentAdmin, session_keys};
use crate::state::AppState;

/// Login page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct LoginPageTemplate {
    pub username: String,
    pub error: Option<String>,
    pub info: Option<&'static str>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub expired: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Render the login page.
///
/// GET /auth/login
pub async fn login_page(session: Session, Query(query): Query<LoginQuery>) -> Result<Response> {
    let logged_in = session
        .get::<StoredAdmin>(session_keys::CURRENT_ADMIN)
        .await?
        .is_some();
    if logged_in {
        return Ok(Redirect::to("/").into_response());
    }

    let info = query
        .expired
        .is_some()
        .then_some("Your session has expired. Please sign in again.");

    Ok(render(&LoginPageTemplate {
        username: String::new(),
        error: None,
        info,
    })?
    .into_response())
}

/// Exchange credentials for an API token.
///
/// POST /auth/login
#[instrument(skip_all, fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let error = match state.api().login(form.username.trim(), &form.password).await {
        Ok(login) => {
            let admin = CurrentAdmin {
                username: login.session.username,
                token: login.token,
            };
            set_current_admin(&session, &admin).await?;
            tracing::info!("Admin signed in");
            return Ok(Redirect::to("/").into_response());
        }
        Err(ClientError::Unauthorized(_) | ClientError::Validation(_)) => {
            tracing::warn!("Admin sign-in rejected");
            "Invalid username or password"
        }
        Err(e) => {
            tracing::error!(error = %e, "Admin sign-in failed");
            "Sign-in is unavailable right now. Please try again shortly."
        }
    };

    let page = render(&LoginPageTemplate {
        username: form.username,
        error: Some(error.to_string()),
        info: None,
    })?;
    Ok((StatusCode::UNAUTHORIZED, page).into_response())
}

/// Revoke the API token and clear the session.
///
/// POST /auth/logout
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    if let Some(stored) = session
        .get::<StoredAdmin>(session_keys::CURRENT_ADMIN)
        .await?
    {
        let admin = CurrentAdmin::from(stored);
        if let Err(e) = state.api().admin(&admin.token).logout().await {
            tracing::warn!(error = %e, "Failed to revoke API token on logout");
        }
    }

    clear_current_admin(&session).await?;
    Ok(Redirect::to("/auth/login"))
}
