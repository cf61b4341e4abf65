//! Admin login endpoints.

use axum::{Json, extract::State, http::HeaderMap};
use serde::Deserialize;
use tracing::instrument;

use super::MessageResponse;
use crate::error::{ApiJson, AppError, Result};
use crate::middleware::RequireAdmin;
use crate::middleware::auth::bearer_token;
use crate::services::auth::{AdminSession, IssuedToken};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// `POST /api/auth/login`
#[instrument(skip_all, fields(username = %body.username))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<IssuedToken>> {
    match state.auth().login(&body.username, &body.password).await {
        Ok(issued) => {
            tracing::info!("Admin logged in");
            Ok(Json(issued))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Admin login failed");
            Err(e.into())
        }
    }
}

/// `POST /api/auth/logout`
#[instrument(skip_all, fields(admin = %admin.username))]
pub async fn logout(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>> {
    let token = bearer_token(&headers)
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;
    state.auth().logout(token).await;
    Ok(Json(MessageResponse::new("Logged out")))
}

/// `GET /api/auth/session`
pub async fn session(RequireAdmin(admin): RequireAdmin) -> Json<AdminSession> {
    Json(admin)
}
