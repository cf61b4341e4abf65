//! Admin panel flows through a real browser session.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use granite_world_core::{CustomerQueryInput, QueryStatus};
use granite_world_integration_tests::{ADMIN_PASSWORD, ADMIN_USERNAME, TestContext};

async fn page(browser: &reqwest::Client, url: String) -> (reqwest::StatusCode, String) {
    let response = browser.get(url).send().await.unwrap();
    (response.status(), response.text().await.unwrap())
}

#[tokio::test]
async fn test_dashboard_requires_login() {
    let ctx = TestContext::start().await;
    let browser = TestContext::browser_no_redirect();

    let response = browser.get(format!("{}/", ctx.admin_url)).send().await.unwrap();
    assert_eq!(response.status(), 303);
    assert_eq!(response.headers()["location"], "/auth/login");
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let ctx = TestContext::start().await;
    let response = TestContext::browser()
        .post(format!("{}/auth/login", ctx.admin_url))
        .form(&[("username", ADMIN_USERNAME), ("password", "nope")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
    assert!(response.text().await.unwrap().contains("Invalid username or password"));
}

#[tokio::test]
async fn test_login_dashboard_and_logout() {
    let ctx = TestContext::start().await;
    let browser = TestContext::browser();
    ctx.admin_login(&browser).await;

    let (status, html) = page(&browser, format!("{}/", ctx.admin_url)).await;
    assert_eq!(status, 200);
    assert!(html.contains("Dashboard"));
    assert!(html.contains(ADMIN_USERNAME));

    // Already signed in: the login page bounces to the dashboard
    let (_, html) = page(&browser, format!("{}/auth/login", ctx.admin_url)).await;
    assert!(html.contains("Dashboard"));

    let response = browser
        .post(format!("{}/auth/logout", ctx.admin_url))
        .send()
        .await
        .unwrap();
    assert!(response.url().path().starts_with("/auth/login"));

    let (_, html) = page(&browser, format!("{}/products", ctx.admin_url)).await;
    assert!(html.contains("name=\"password\""));
}

#[tokio::test]
async fn test_product_management() {
    let ctx = TestContext::start().await;
    let browser = TestContext::browser();
    ctx.admin_login(&browser).await;

    // Bad price re-renders the form with the input kept
    let response = browser
        .post(format!("{}/products", ctx.admin_url))
        .form(&[
            ("name", "Absolute Black"),
            ("description", "Indian black"),
            ("price", "abc"),
            ("category", "Slabs"),
            ("image_url", ""),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);
    let html = response.text().await.unwrap();
    assert!(html.contains("price must be a number"));
    assert!(html.contains("Absolute Black"));

    let response = browser
        .post(format!("{}/products", ctx.admin_url))
        .form(&[
            ("name", "Absolute Black"),
            ("description", "Indian black"),
            ("price", "1450"),
            ("category", "Slabs"),
            ("image_url", ""),
            ("featured", "on"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.url().path(), "/products");
    let html = response.text().await.unwrap();
    assert!(html.contains("Created"));
    assert!(html.contains("1450.00"));

    let product = ctx.api().featured_products().await.unwrap().remove(0);
    assert_eq!(product.name, "Absolute Black");

    // Reserved name is refused by the API and shown on the form
    let response = browser
        .post(format!("{}/products/{}", ctx.admin_url, product.id))
        .form(&[
            ("name", "General Inquiry"),
            ("description", "Indian black"),
            ("price", "1450"),
            ("category", "Slabs"),
            ("image_url", ""),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);
    assert!(response.text().await.unwrap().contains("reserved"));

    let response = browser
        .post(format!("{}/products/{}/delete", ctx.admin_url, product.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.url().path(), "/products");
    assert!(ctx.api().list_products().await.unwrap().is_empty());

    // Second delete is a flash, not an error page
    let response = browser
        .post(format!("{}/products/{}/delete", ctx.admin_url, product.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.text().await.unwrap().contains("Product not found"));
}

#[tokio::test]
async fn test_sentinel_cannot_be_deleted_from_panel() {
    let ctx = TestContext::start().await;
    let browser = TestContext::browser();
    ctx.admin_login(&browser).await;

    let response = browser
        .post(format!("{}/products/{}/delete", ctx.admin_url, ctx.general_inquiry_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.text().await.unwrap().contains("cannot be deleted"));
    assert!(ctx.api().general_product().await.is_ok());
}

#[tokio::test]
async fn test_inquiry_management() {
    let ctx = TestContext::start().await;
    let query = ctx
        .api()
        .submit_query(&CustomerQueryInput {
            name: "Morgan Quarry".to_string(),
            email: "morgan@example.com".to_string(),
            phone: "555-0123".to_string(),
            message: "Can you match an existing worktop?".to_string(),
            product_id: Some(ctx.general_inquiry_id),
        })
        .await
        .unwrap();

    let browser = TestContext::browser();
    ctx.admin_login(&browser).await;

    let (_, html) = page(&browser, format!("{}/inquiries?status=pending", ctx.admin_url)).await;
    assert!(html.contains("Morgan Quarry"));
    assert!(html.contains("General Inquiry"));

    let response = browser
        .post(format!("{}/inquiries/{}/status", ctx.admin_url, query.id))
        .form(&[("status", "responded")])
        .send()
        .await
        .unwrap();
    assert!(response.text().await.unwrap().contains("Marked as Responded"));

    let login = ctx.api().login(ADMIN_USERNAME, ADMIN_PASSWORD).await.unwrap();
    let detail = ctx.api().admin(&login.token).get_query(query.id).await.unwrap();
    assert_eq!(detail.query.status, QueryStatus::Responded);

    let (_, html) = page(&browser, format!("{}/inquiries?status=pending", ctx.admin_url)).await;
    assert!(!html.contains("Morgan Quarry"));

    let response = browser
        .post(format!("{}/inquiries/{}/delete", ctx.admin_url, query.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.url().path(), "/inquiries");
    assert!(ctx.api().admin(&login.token).list_queries().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_gallery_management() {
    let ctx = TestContext::start().await;
    let browser = TestContext::browser();
    ctx.admin_login(&browser).await;

    let response = browser
        .post(format!("{}/gallery", ctx.admin_url))
        .form(&[
            ("image_url", "https://img.example/island.jpg"),
            ("caption", "Kitchen island"),
            ("description", ""),
            ("tags", "kitchen, , black granite"),
            ("featured", "on"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.url().path(), "/gallery");
    assert!(response.text().await.unwrap().contains("Kitchen island"));

    let post = ctx.api().featured_gallery_posts().await.unwrap().remove(0);
    assert_eq!(post.tags, vec!["kitchen", "black granite"]);

    let (status, html) = page(&browser, format!("{}/gallery/{}/edit", ctx.admin_url, post.id)).await;
    assert_eq!(status, 200);
    assert!(html.contains("kitchen, black granite"));

    let response = browser
        .post(format!("{}/gallery/{}", ctx.admin_url, post.id))
        .form(&[
            ("image_url", "https://img.example/island.jpg"),
            ("caption", "Island with waterfall edge"),
            ("description", ""),
            ("tags", "kitchen"),
        ])
        .send()
        .await
        .unwrap();
    assert!(response.text().await.unwrap().contains("Saved"));
    assert!(ctx.api().featured_gallery_posts().await.unwrap().is_empty());

    browser
        .post(format!("{}/gallery/{}/delete", ctx.admin_url, post.id))
        .send()
        .await
        .unwrap();
    assert!(ctx.api().list_gallery_posts().await.unwrap().is_empty());
}
