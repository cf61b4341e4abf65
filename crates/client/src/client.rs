//! `ApiClient` implementation.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use granite_world_core::{
    CustomerQuery, CustomerQueryDetail, CustomerQueryId, CustomerQueryInput, CustomerQueryPatch,
    GalleryPost, GalleryPostId, GalleryPostInput, Product, ProductId, ProductInput, ProductPatch,
};

use crate::ClientError;

/// Per-request timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest slice of an unexpected response body kept in logs and errors.
const BODY_EXCERPT: usize = 200;

/// The identity behind an admin token, as reported by `/api/auth/session`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub username: String,
    /// `shared` or `login`
    pub kind: String,
    pub issued_at: DateTime<Utc>,
}

/// Result of a successful `/api/auth/login`.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub token: SecretString,
    pub expires_in: Duration,
    pub session: SessionInfo,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLoginResponse {
    token: String,
    expires_in: u64,
    session: SessionInfo,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the Granite World API.
///
/// Cheap to clone. Public endpoints are methods on the client itself; admin
/// endpoints go through [`ApiClient::admin`] with a bearer token.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client with the default 10 second timeout.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidUrl` if `base_url` is not an absolute URL.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidUrl` for a bad base URL, or
    /// `ClientError::Http` if the HTTP client cannot be built.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = normalize_base_url(base_url)?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("granite-world-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner { http, base_url }),
        })
    }

    /// The API origin, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Borrow the admin endpoints for `token`.
    #[must_use]
    pub const fn admin<'a>(&'a self, token: &'a SecretString) -> AdminApi<'a> {
        AdminApi {
            client: self,
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{path}", self.inner.base_url)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.inner.http.get(self.url(path))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.inner.http.post(self.url(path))
    }

    /// Send a request and decode a JSON success body.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        // Read as text first for better diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            return Err(error_from_response(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %excerpt(&body),
                "Failed to decode API response"
            );
            ClientError::Decode(e)
        })
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    /// `GET /api/products` (sentinel excluded).
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport or API failure.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        self.send(self.get("/products")).await
    }

    /// `GET /api/products/featured`
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport or API failure.
    #[instrument(skip(self))]
    pub async fn featured_products(&self) -> Result<Vec<Product>, ClientError> {
        self.send(self.get("/products/featured")).await
    }

    /// `GET /api/products/general`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the sentinel has not been seeded.
    #[instrument(skip(self))]
    pub async fn general_product(&self) -> Result<Product, ClientError> {
        self.send(self.get("/products/general")).await
    }

    /// `GET /api/products/{id}`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` for an unknown id.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ClientError> {
        self.send(self.get(&format!("/products/{id}"))).await
    }

    // -------------------------------------------------------------------------
    // Gallery
    // -------------------------------------------------------------------------

    /// `GET /api/gallery` (newest first).
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport or API failure.
    #[instrument(skip(self))]
    pub async fn list_gallery_posts(&self) -> Result<Vec<GalleryPost>, ClientError> {
        self.send(self.get("/gallery")).await
    }

    /// `GET /api/gallery/featured`
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport or API failure.
    #[instrument(skip(self))]
    pub async fn featured_gallery_posts(&self) -> Result<Vec<GalleryPost>, ClientError> {
        self.send(self.get("/gallery/featured")).await
    }

    /// `GET /api/gallery/{id}`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` for an unknown id.
    #[instrument(skip(self), fields(post_id = %id))]
    pub async fn get_gallery_post(&self, id: GalleryPostId) -> Result<GalleryPost, ClientError> {
        self.send(self.get(&format!("/gallery/{id}"))).await
    }

    // -------------------------------------------------------------------------
    // Customer queries / auth
    // -------------------------------------------------------------------------

    /// `POST /api/customer-queries`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` with the API's message when the
    /// submission is rejected.
    #[instrument(skip_all)]
    pub async fn submit_query(
        &self,
        input: &CustomerQueryInput,
    ) -> Result<CustomerQuery, ClientError> {
        self.send(self.post("/customer-queries").json(input)).await
    }

    /// `POST /api/auth/login`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Unauthorized` for wrong credentials.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let raw: RawLoginResponse = self
            .send(
                self.post("/auth/login")
                    .json(&LoginRequest { username, password }),
            )
            .await?;

        Ok(LoginResponse {
            token: SecretString::from(raw.token),
            expires_in: Duration::from_secs(raw.expires_in),
            session: raw.session,
        })
    }
}

// =============================================================================
// AdminApi
// =============================================================================

/// Bearer-authenticated endpoints.
#[derive(Clone, Copy)]
pub struct AdminApi<'a> {
    client: &'a ApiClient,
    token: &'a SecretString,
}

impl AdminApi<'_> {
    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(self.token.expose_secret())
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        self.client.send(self.authed(request)).await
    }

    async fn delete(&self, path: &str) -> Result<String, ClientError> {
        let request = self.client.inner.http.delete(self.client.url(path));
        let body: MessageBody = self.send(request).await?;
        Ok(body.message)
    }

    fn put(&self, path: &str) -> RequestBuilder {
        self.client.inner.http.put(self.client.url(path))
    }

    /// `GET /api/auth/session`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Unauthorized` if the token is no longer valid.
    pub async fn session(&self) -> Result<SessionInfo, ClientError> {
        self.send(self.client.get("/auth/session")).await
    }

    /// `POST /api/auth/logout`
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport or API failure.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let _: MessageBody = self.send(self.client.post("/auth/logout")).await?;
        Ok(())
    }

    /// `POST /api/products`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` when the API rejects the input.
    #[instrument(skip_all)]
    pub async fn create_product(&self, input: &ProductInput) -> Result<Product, ClientError> {
        self.send(self.client.post("/products").json(input)).await
    }

    /// `PUT /api/products/{id}`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` or `ClientError::Validation`.
    #[instrument(skip(self, patch), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, ClientError> {
        self.send(self.put(&format!("/products/{id}")).json(patch))
            .await
    }

    /// `DELETE /api/products/{id}`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` or `ClientError::Validation` (sentinel).
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<String, ClientError> {
        self.delete(&format!("/products/{id}")).await
    }

    /// `GET /api/customer-queries` (newest first, products expanded).
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport or API failure.
    #[instrument(skip(self))]
    pub async fn list_queries(&self) -> Result<Vec<CustomerQueryDetail>, ClientError> {
        self.send(self.client.get("/customer-queries")).await
    }

    /// `GET /api/customer-queries/{id}`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` for an unknown id.
    #[instrument(skip(self), fields(query_id = %id))]
    pub async fn get_query(&self, id: CustomerQueryId) -> Result<CustomerQueryDetail, ClientError> {
        self.send(self.client.get(&format!("/customer-queries/{id}")))
            .await
    }

    /// `PUT /api/customer-queries/{id}`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` or `ClientError::Validation`.
    #[instrument(skip(self, patch), fields(query_id = %id))]
    pub async fn update_query(
        &self,
        id: CustomerQueryId,
        patch: &CustomerQueryPatch,
    ) -> Result<CustomerQuery, ClientError> {
        self.send(self.put(&format!("/customer-queries/{id}")).json(patch))
            .await
    }

    /// `DELETE /api/customer-queries/{id}`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` for an unknown id.
    #[instrument(skip(self), fields(query_id = %id))]
    pub async fn delete_query(&self, id: CustomerQueryId) -> Result<String, ClientError> {
        self.delete(&format!("/customer-queries/{id}")).await
    }

    /// `POST /api/gallery`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` when the API rejects the input.
    #[instrument(skip_all)]
    pub async fn create_gallery_post(
        &self,
        input: &GalleryPostInput,
    ) -> Result<GalleryPost, ClientError> {
        self.send(self.client.post("/gallery").json(input)).await
    }

    /// `PUT /api/gallery/{id}` (full replace, likes preserved).
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` or `ClientError::Validation`.
    #[instrument(skip(self, input), fields(post_id = %id))]
    pub async fn update_gallery_post(
        &self,
        id: GalleryPostId,
        input: &GalleryPostInput,
    ) -> Result<GalleryPost, ClientError> {
        self.send(self.put(&format!("/gallery/{id}")).json(input))
            .await
    }

    /// `DELETE /api/gallery/{id}`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` for an unknown id.
    #[instrument(skip(self), fields(post_id = %id))]
    pub async fn delete_gallery_post(&self, id: GalleryPostId) -> Result<String, ClientError> {
        self.delete(&format!("/gallery/{id}")).await
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Validate `raw` as an absolute http(s) URL and strip trailing slashes.
fn normalize_base_url(raw: &str) -> Result<String, ClientError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = url::Url::parse(trimmed)?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ClientError::InvalidUrl(url::ParseError::RelativeUrlWithoutBase));
    }
    Ok(trimmed.to_string())
}

/// Map a non-success response onto [`ClientError`].
fn error_from_response(status: StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorBody>(body).map_or_else(
        |_| {
            let text = excerpt(body);
            if text.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unexpected response")
                    .to_string()
            } else {
                text
            }
        },
        |b| b.message,
    );

    match status {
        StatusCode::BAD_REQUEST => ClientError::Validation(message),
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        _ => {
            tracing::warn!(status = %status, message = %message, "API returned an error");
            ClientError::Api {
                status: status.as_u16(),
                message,
            }
        }
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = ApiClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/products"), "http://localhost:5000/api/products");

        let client = ApiClient::new("https://api.example.com//").unwrap();
        assert_eq!(client.base_url(), "https://api.example.com");
    }

    #[test]
    fn test_base_url_must_be_absolute_http() {
        assert!(matches!(
            ApiClient::new("localhost:5000"),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(ApiClient::new("/api").is_err());
        assert!(ApiClient::new("ftp://example.com").is_err());
    }

    #[test]
    fn test_error_mapping_uses_api_message() {
        let body = r#"{"message":"name is required","error":"name"}"#;
        match error_from_response(StatusCode::BAD_REQUEST, body) {
            ClientError::Validation(message) => assert_eq!(message, "name is required"),
            other => panic!("unexpected: {other:?}"),
        }

        let body = r#"{"message":"Product not found"}"#;
        let err = error_from_response(StatusCode::NOT_FOUND, body);
        assert!(err.is_not_found());

        let err = error_from_response(StatusCode::UNAUTHORIZED, "");
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "unauthorized: Unauthorized");
    }

    #[test]
    fn test_error_mapping_other_status() {
        let err = error_from_response(StatusCode::BAD_GATEWAY, "<html>proxy</html>");
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "<html>proxy</html>");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_validation_message() {
        let err = ClientError::Validation("invalid email: missing @".to_string());
        assert_eq!(err.validation_message(), Some("invalid email: missing @"));
        assert_eq!(ClientError::NotFound("x".into()).validation_message(), None);
    }
}
