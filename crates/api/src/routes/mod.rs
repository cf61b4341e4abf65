//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Welcome
//! GET  /health                        - Liveness
//! GET  /health/ready                  - Readiness (store ping)
//!
//! GET  /api/products                  - Catalogue (sentinel hidden)
//! GET  /api/products/featured         - Up to 5 featured products
//! GET  /api/products/general          - "General Inquiry" sentinel
//! GET  /api/products/{id}
//! POST /api/products                  *
//! PUT  /api/products/{id}             *
//! DEL  /api/products/{id}             *
//!
//! GET  /api/customer-queries          *
//! GET  /api/customer-queries/{id}     *
//! POST /api/customer-queries          - Public submission
//! PUT  /api/customer-queries/{id}     *
//! DEL  /api/customer-queries/{id}     *
//!
//! GET  /api/gallery
//! GET  /api/gallery/featured
//! GET  /api/gallery/{id}
//! POST /api/gallery                   *
//! PUT  /api/gallery/{id}              *
//! DEL  /api/gallery/{id}              *
//!
//! POST /api/auth/login
//! POST /api/auth/logout               *
//! GET  /api/auth/session              *
//! ```
//!
//! `*` requires `Authorization: Bearer <token>`.

pub mod auth;
pub mod customer_queries;
pub mod gallery;
pub mod products;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};

use crate::middleware::require_admin;
use crate::state::AppState;

/// `{"message": "..."}` acknowledgement body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Build the `/api` router.
pub fn api_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/products", get(products::list))
        .route("/products/featured", get(products::featured))
        .route("/products/general", get(products::general))
        .route("/products/{id}", get(products::show))
        .route("/customer-queries", post(customer_queries::create))
        .route("/gallery", get(gallery::list))
        .route("/gallery/featured", get(gallery::featured))
        .route("/gallery/{id}", get(gallery::show))
        .route("/auth/login", post(auth::login));

    let admin = Router::new()
        .route("/products", post(products::create))
        .route(
            "/products/{id}",
            put(products::update).delete(products::delete),
        )
        .route("/customer-queries", get(customer_queries::list))
        .route(
            "/customer-queries/{id}",
            get(customer_queries::show)
                .put(customer_queries::update)
                .delete(customer_queries::delete),
        )
        .route("/gallery", post(gallery::create))
        .route("/gallery/{id}", put(gallery::update).delete(gallery::delete))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/session", get(auth::session))
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    Router::new().nest("/api", public.merge(admin))
}

/// Build the top-level router (health checks plus `/api`).
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(api_routes(state))
}

async fn welcome() -> Json<MessageResponse> {
    Json(MessageResponse::new("Welcome to the Granite World API"))
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use chrono::{DateTime, Utc};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use granite_world_core::ProductId;

    use crate::db::ensure_general_inquiry;
    use crate::services::auth::tests::{TEST_PASSWORD, TEST_SHARED_TOKEN};
    use crate::state::AppState;
    use crate::test_support::test_state;

    async fn send(
        state: &AppState,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = crate::app(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn slab(name: &str, featured: bool) -> Value {
        json!({
            "name": name,
            "description": "Polished granite slab",
            "price": 450.0,
            "category": "Slabs",
            "featured": featured,
        })
    }

    async fn create_product(state: &AppState, name: &str, featured: bool) -> Value {
        let (status, body) = send(
            state,
            Method::POST,
            "/api/products",
            Some(TEST_SHARED_TOKEN),
            Some(slab(name, featured)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    #[tokio::test]
    async fn test_welcome_and_health() {
        let state = test_state();
        let (status, body) = send(&state, Method::GET, "/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].as_str().unwrap().contains("Granite World"));

        let (status, _) = send(&state, Method::GET, "/health/ready", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_product_missing_fields_is_400_and_not_stored() {
        let state = test_state();
        let (status, body) = send(
            &state,
            Method::POST,
            "/api/products",
            Some(TEST_SHARED_TOKEN),
            Some(json!({"name": "Only a name"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "description is required");

        let (_, list) = send(&state, Method::GET, "/api/products", None, None).await;
        assert_eq!(list.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_create_product_with_wrong_types_is_400() {
        let state = test_state();
        let (status, body) = send(
            &state,
            Method::POST,
            "/api/products",
            Some(TEST_SHARED_TOKEN),
            Some(json!({"name": "A", "description": "d", "price": "lots"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid request body");
    }

    #[tokio::test]
    async fn test_create_product_price_out_of_range_is_400() {
        let state = test_state();
        for (price, detail) in [
            (json!(1e12), "price cannot exceed"),
            (json!(10.005), "more than 2 decimal places"),
        ] {
            let (status, body) = send(
                &state,
                Method::POST,
                "/api/products",
                Some(TEST_SHARED_TOKEN),
                Some(json!({"name": "A", "description": "d", "price": price})),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(body["error"].as_str().unwrap().contains(detail), "{body}");
        }

        let (_, list) = send(&state, Method::GET, "/api/products", None, None).await;
        assert_eq!(list.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_product_not_found() {
        let state = test_state();
        let uri = format!("/api/products/{}", ProductId::generate());
        let (status, body) = send(&state, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Product not found");

        let (status, _) = send(&state, Method::GET, "/api/products/not-a-uuid", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_listing_hides_general_inquiry() {
        let state = test_state();
        ensure_general_inquiry(state.store(), state.general_inquiry_id())
            .await
            .unwrap();
        create_product(&state, "Blue Pearl", false).await;

        let (_, list) = send(&state, Method::GET, "/api/products", None, None).await;
        let names: Vec<_> = list
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap().to_owned())
            .collect();
        assert_eq!(names, vec!["Blue Pearl"]);

        let (status, general) = send(&state, Method::GET, "/api/products/general", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(general["name"], "General Inquiry");
        assert_eq!(general["id"], ProductId::GENERAL_INQUIRY.to_string());
    }

    #[tokio::test]
    async fn test_general_missing_before_seed() {
        let state = test_state();
        let (status, body) = send(&state, Method::GET, "/api/products/general", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "General product not found");
    }

    #[tokio::test]
    async fn test_reserved_name_rejected() {
        let state = test_state();
        let (status, body) = send(
            &state,
            Method::POST,
            "/api/products",
            Some(TEST_SHARED_TOKEN),
            Some(slab("general inquiry", false)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "name");
    }

    #[tokio::test]
    async fn test_featured_is_capped_at_five() {
        let state = test_state();
        ensure_general_inquiry(state.store(), state.general_inquiry_id())
            .await
            .unwrap();
        for i in 0..7 {
            create_product(&state, &format!("Featured {i}"), true).await;
        }
        create_product(&state, "Plain", false).await;

        let (_, featured) = send(&state, Method::GET, "/api/products/featured", None, None).await;
        let featured = featured.as_array().unwrap();
        assert_eq!(featured.len(), 5);
        assert!(featured.iter().all(|p| p["featured"] == true));
    }

    #[tokio::test]
    async fn test_mutations_require_token() {
        let state = test_state();
        let (status, _) = send(
            &state,
            Method::POST,
            "/api/products",
            None,
            Some(slab("A", false)),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send(
            &state,
            Method::POST,
            "/api/gallery",
            Some("demo-token"),
            Some(json!({"imageUrl": "/a.jpg", "caption": "A"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid or expired token");

        let (status, _) = send(&state, Method::GET, "/api/customer-queries", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_product_patch() {
        let state = test_state();
        let created = create_product(&state, "Tan Brown", false).await;
        let uri = format!("/api/products/{}", created["id"].as_str().unwrap());

        let (status, updated) = send(
            &state,
            Method::PUT,
            &uri,
            Some(TEST_SHARED_TOKEN),
            Some(json!({"featured": true, "price": 99.5})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["featured"], true);
        assert_eq!(updated["price"], 99.5);
        assert_eq!(updated["name"], "Tan Brown");

        let (status, _) = send(
            &state,
            Method::PUT,
            &uri,
            Some(TEST_SHARED_TOKEN),
            Some(json!({"colour": "brown"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_product_delete() {
        let state = test_state();
        let created = create_product(&state, "Tan Brown", false).await;
        let uri = format!("/api/products/{}", created["id"].as_str().unwrap());

        let (status, body) = send(&state, Method::DELETE, &uri, Some(TEST_SHARED_TOKEN), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Product deleted successfully");

        let (status, _) = send(&state, Method::DELETE, &uri, Some(TEST_SHARED_TOKEN), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_sentinel_cannot_be_deleted() {
        let state = test_state();
        ensure_general_inquiry(state.store(), state.general_inquiry_id())
            .await
            .unwrap();
        let uri = format!("/api/products/{}", ProductId::GENERAL_INQUIRY);
        let (status, _) = send(&state, Method::DELETE, &uri, Some(TEST_SHARED_TOKEN), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_customer_query_lifecycle() {
        let state = test_state();
        let product = create_product(&state, "Absolute Black", false).await;

        let (status, created) = send(
            &state,
            Method::POST,
            "/api/customer-queries",
            None,
            Some(json!({
                "name": "A",
                "email": "a@x.com",
                "phone": "1",
                "message": "hi",
                "productId": product["id"],
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "pending");
        assert_eq!(created["name"], "A");
        assert_eq!(created["productId"], product["id"]);
        assert!(created["createdAt"].is_string());

        let uri = format!("/api/customer-queries/{}", created["id"].as_str().unwrap());
        let (status, updated) = send(
            &state,
            Method::PUT,
            &uri,
            Some(TEST_SHARED_TOKEN),
            Some(json!({"status": "responded"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "responded");
        for field in ["id", "name", "email", "phone", "message", "productId", "createdAt"] {
            assert_eq!(updated[field], created[field], "{field} changed");
        }
        let timestamp = |v: &Value| {
            v["updatedAt"]
                .as_str()
                .unwrap()
                .parse::<DateTime<Utc>>()
                .unwrap()
        };
        assert!(timestamp(&updated) >= timestamp(&created));

        let (_, list) = send(
            &state,
            Method::GET,
            "/api/customer-queries",
            Some(TEST_SHARED_TOKEN),
            None,
        )
        .await;
        assert_eq!(list[0]["product"]["name"], "Absolute Black");

        let (status, body) = send(&state, Method::DELETE, &uri, Some(TEST_SHARED_TOKEN), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Customer query deleted successfully");
    }

    #[tokio::test]
    async fn test_customer_query_requires_existing_product() {
        let state = test_state();
        let (status, body) = send(
            &state,
            Method::POST,
            "/api/customer-queries",
            None,
            Some(json!({
                "name": "A",
                "email": "a@x.com",
                "phone": "1",
                "message": "hi",
                "productId": ProductId::generate(),
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "productId");
    }

    #[tokio::test]
    async fn test_customer_query_status_must_be_known() {
        let state = test_state();
        let product = create_product(&state, "Absolute Black", false).await;
        let (_, created) = send(
            &state,
            Method::POST,
            "/api/customer-queries",
            None,
            Some(json!({
                "name": "A", "email": "a@x.com", "phone": "1", "message": "hi",
                "productId": product["id"],
            })),
        )
        .await;
        let uri = format!("/api/customer-queries/{}", created["id"].as_str().unwrap());
        let (status, _) = send(
            &state,
            Method::PUT,
            &uri,
            Some(TEST_SHARED_TOKEN),
            Some(json!({"status": "archived"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_gallery_delete_requires_valid_token() {
        let state = test_state();
        let (status, post) = send(
            &state,
            Method::POST,
            "/api/gallery",
            Some(TEST_SHARED_TOKEN),
            Some(json!({
                "imageUrl": "/img/patio.jpg",
                "caption": "Patio",
                "tags": ["outdoor", " ", " paving "],
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(post["tags"], json!(["outdoor", "paving"]));
        assert_eq!(post["likes"], 0);

        let uri = format!("/api/gallery/{}", post["id"].as_str().unwrap());
        let (status, _) = send(&state, Method::DELETE, &uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = send(&state, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&state, Method::DELETE, &uri, Some(TEST_SHARED_TOKEN), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&state, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_gallery_featured_newest_first() {
        let state = test_state();
        for (caption, featured) in [("old", true), ("plain", false), ("new", true)] {
            send(
                &state,
                Method::POST,
                "/api/gallery",
                Some(TEST_SHARED_TOKEN),
                Some(json!({"imageUrl": "/i.jpg", "caption": caption, "featured": featured})),
            )
            .await;
        }
        let (_, featured) = send(&state, Method::GET, "/api/gallery/featured", None, None).await;
        let captions: Vec<_> = featured
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["caption"].as_str().unwrap().to_owned())
            .collect();
        assert_eq!(captions, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn test_login_token_flow() {
        let state = test_state();
        let (status, _) = send(
            &state,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"username": "admin", "password": "admin123"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, issued) = send(
            &state,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"username": "admin", "password": TEST_PASSWORD})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = issued["token"].as_str().unwrap().to_owned();

        let (status, session) =
            send(&state, Method::GET, "/api/auth/session", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(session["kind"], "login");

        let (status, _) = send(&state, Method::POST, "/api/auth/logout", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            &state,
            Method::POST,
            "/api/products",
            Some(&token),
            Some(slab("After logout", false)),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
