//! Public pages and inquiry submission.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use granite_world_core::{Price, ProductInput};
use granite_world_integration_tests::{ADMIN_PASSWORD, ADMIN_USERNAME, TestContext};

async fn seed_product(ctx: &TestContext, name: &str, category: &str, featured: bool) {
    let api = ctx.api();
    let login = api.login(ADMIN_USERNAME, ADMIN_PASSWORD).await.unwrap();
    api.admin(&login.token)
        .create_product(&ProductInput {
            name: name.to_string(),
            description: format!("{name} granite"),
            price: Some(Price::new(250.into()).unwrap()),
            category: category.to_string(),
            image_url: String::new(),
            featured,
        })
        .await
        .unwrap();
}

async fn get(ctx: &TestContext, path: &str) -> (reqwest::StatusCode, String) {
    let response = TestContext::browser()
        .get(format!("{}{path}", ctx.storefront_url))
        .send()
        .await
        .unwrap();
    (response.status(), response.text().await.unwrap())
}

#[tokio::test]
async fn test_home_shows_featured_products() {
    let ctx = TestContext::start().await;
    seed_product(&ctx, "Absolute Black", "Slabs", true).await;
    seed_product(&ctx, "Kashmir White", "Slabs", false).await;

    let (status, html) = get(&ctx, "/").await;
    assert_eq!(status, 200);
    assert!(html.contains("Absolute Black"));
    assert!(!html.contains("Kashmir White"));
}

#[tokio::test]
async fn test_catalogue_filters() {
    let ctx = TestContext::start().await;
    seed_product(&ctx, "Absolute Black", "Slabs", false).await;
    seed_product(&ctx, "Angel Memorial", "Memorials", false).await;

    let (status, html) = get(&ctx, "/products").await;
    assert_eq!(status, 200);
    assert!(html.contains("Absolute Black"));
    assert!(html.contains("Angel Memorial"));
    assert!(!html.contains("General Inquiry"));

    let (_, html) = get(&ctx, "/products?category=Memorials").await;
    assert!(html.contains("Angel Memorial"));
    assert!(!html.contains("Absolute Black"));

    let (_, html) = get(&ctx, "/products?q=absolute").await;
    assert!(html.contains("Absolute Black"));
    assert!(!html.contains("Angel Memorial"));
}

#[tokio::test]
async fn test_missing_product_is_not_found() {
    let ctx = TestContext::start().await;
    let (status, _) = get(&ctx, "/products/not-a-uuid").await;
    assert_eq!(status, 404);

    let (status, _) = get(&ctx, "/products/00000000-0000-4000-8000-000000000000").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_contact_form_files_general_inquiry() {
    let ctx = TestContext::start().await;

    let (status, html) = get(&ctx, "/contact").await;
    assert_eq!(status, 200);
    assert!(!html.contains("Contact form is not ready"));

    let response = TestContext::browser()
        .post(format!("{}/contact", ctx.storefront_url))
        .form(&[
            ("name", "Priya Shah"),
            ("email", "priya@example.com"),
            ("phone", "555-0199"),
            ("message", "Quote for a vanity top please"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.text().await.unwrap().contains("Thank you!"));

    let api = ctx.api();
    let login = api.login(ADMIN_USERNAME, ADMIN_PASSWORD).await.unwrap();
    let queries = api.admin(&login.token).list_queries().await.unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].query.product_id, ctx.general_inquiry_id);
    assert_eq!(queries[0].query.name, "Priya Shah");
}

#[tokio::test]
async fn test_contact_form_keeps_input_on_validation_error() {
    let ctx = TestContext::start().await;

    let response = TestContext::browser()
        .post(format!("{}/contact", ctx.storefront_url))
        .form(&[
            ("name", "Priya Shah"),
            ("email", "not-an-email"),
            ("phone", "555-0199"),
            ("message", "Hello"),
        ])
        .send()
        .await
        .unwrap();
    let html = response.text().await.unwrap();
    assert!(html.contains("invalid email"));
    assert!(html.contains("Priya Shah"));
}

#[tokio::test]
async fn test_contact_form_not_ready_without_sentinel() {
    let ctx = TestContext::start_with_seed(false).await;

    let (status, html) = get(&ctx, "/contact").await;
    assert_eq!(status, 200);
    assert!(html.contains("Contact form is not ready"));
}

#[tokio::test]
async fn test_product_page_inquiry() {
    let ctx = TestContext::start().await;
    seed_product(&ctx, "Blue Pearl", "Slabs", false).await;
    let product = ctx.api().list_products().await.unwrap().remove(0);

    let (status, html) = get(&ctx, &format!("/products/{}", product.id)).await;
    assert_eq!(status, 200);
    assert!(html.contains("Blue Pearl"));

    let response = TestContext::browser()
        .post(format!("{}/products/{}/inquiry", ctx.storefront_url, product.id))
        .form(&[
            ("name", "Lee"),
            ("email", "lee@example.com"),
            ("phone", "555-0111"),
            ("message", "Is this in stock?"),
        ])
        .send()
        .await
        .unwrap();
    assert!(response.text().await.unwrap().contains("Thank you!"));

    let api = ctx.api();
    let login = api.login(ADMIN_USERNAME, ADMIN_PASSWORD).await.unwrap();
    let queries = api.admin(&login.token).list_queries().await.unwrap();
    assert_eq!(queries[0].query.product_id, product.id);
}
