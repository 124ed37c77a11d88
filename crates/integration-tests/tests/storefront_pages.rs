//! Integration tests for catalog pages and the session cart.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use glowglaz_integration_tests::{TestClient, test_app};
use wiremock::MockServer;

async fn client() -> (MockServer, TestClient) {
    let backend = MockServer::start().await;
    let client = TestClient::new(test_app(&backend.uri()));
    (backend, client)
}

// =============================================================================
// Catalog Pages
// =============================================================================

#[tokio::test]
async fn test_home_lists_featured_products_and_deals() {
    let (_backend, mut client) = client().await;

    let response = client.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Shop by category"));
    assert!(response.body.contains("/deals/psorigo"));
}

#[tokio::test]
async fn test_product_listing_filters_by_category() {
    let (_backend, mut client) = client().await;

    let response = client.get("/products?category=skin-care").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("<h1>Skin Care</h1>"));
    assert!(response.body.contains("PSORIGO Oil"));
    assert!(!response.body.contains("Dr. Joints Advanced Joint Health Formula"));
}

#[tokio::test]
async fn test_product_listing_search_without_matches() {
    let (_backend, mut client) = client().await;

    let response = client.get("/products?search=chocolate").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("No products match your filters"));
}

#[tokio::test]
async fn test_product_detail_and_missing_product() {
    let (_backend, mut client) = client().await;

    let found = client.get("/products/2").await;
    assert_eq!(found.status, StatusCode::OK);
    assert!(found.body.contains("Dr. Joints Advanced Joint Health Formula"));

    assert_eq!(client.get("/products/999").await.status, StatusCode::NOT_FOUND);
    assert_eq!(client.get("/products/abc").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deal_page_and_unknown_deal() {
    let (_backend, mut client) = client().await;

    let deal = client.get("/deals/psorigo").await;
    assert_eq!(deal.status, StatusCode::OK);
    assert!(deal.body.contains("PSORIGO Skin Care Bundle Deal"));
    assert!(deal.body.contains("20% OFF"));

    assert_eq!(client.get("/deals/nope").await.status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_add_to_cart_triggers_refresh_and_counts_items() {
    let (_backend, mut client) = client().await;

    let added = client
        .post_form("/cart/add", &[("product_id", "4"), ("quantity", "2")])
        .await;
    assert_eq!(added.status, StatusCode::OK);
    assert_eq!(added.hx_trigger(), Some("cart-updated"));
    assert!(added.body.contains('2'));

    client.post_form("/cart/add", &[("product_id", "4")]).await;
    let count = client.get("/cart/count").await;
    assert!(count.body.contains('3'));
}

#[tokio::test]
async fn test_add_unknown_product_is_not_found() {
    let (_backend, mut client) = client().await;

    let response = client.post_form("/cart/add", &[("product_id", "42")]).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body.contains("Product not found"));
}

#[tokio::test]
async fn test_deal_price_applies_only_to_covered_products() {
    let (_backend, mut client) = client().await;

    client
        .post_form("/cart/add", &[("product_id", "4"), ("deal", "psorigo")])
        .await;
    // Product 1 is not part of the psorigo deal: full price.
    client
        .post_form("/cart/add", &[("product_id", "1"), ("deal", "psorigo")])
        .await;

    let cart = client.get("/cart").await;
    assert_eq!(cart.status, StatusCode::OK);
    // 20% off ₹1,499 is ₹1,199.20
    assert!(cart.body.contains("₹1,199.20"));
    assert!(cart.body.contains("₹3,990"));
}

#[tokio::test]
async fn test_update_remove_and_clear() {
    let (_backend, mut client) = client().await;
    client.post_form("/cart/add", &[("product_id", "5")]).await;
    client.post_form("/cart/add", &[("product_id", "6")]).await;

    let updated = client
        .post_form("/cart/update", &[("product_id", "5"), ("quantity", "3")])
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.hx_trigger(), Some("cart-updated"));
    assert!(updated.body.contains("value=\"3\""));

    let removed = client.post_form("/cart/remove", &[("product_id", "6")]).await;
    assert!(!removed.body.contains("PSORIGO Oil"));
    assert!(removed.body.contains("PSORIGO Body Wash"));

    let cleared = client.post_form("/cart/clear", &[]).await;
    assert!(cleared.body.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_shipping_fee_waived_above_threshold() {
    let (_backend, mut client) = client().await;

    client.post_form("/cart/add", &[("product_id", "4")]).await;
    let small = client.get("/cart").await;
    assert!(small.body.contains("₹99"));

    client.post_form("/cart/add", &[("product_id", "1")]).await;
    let large = client.get("/cart").await;
    assert!(large.body.contains("<dd>Free</dd>"));
}

#[tokio::test]
async fn test_buy_now_redirects_to_checkout() {
    let (_backend, mut client) = client().await;

    let response = client
        .post_form("/cart/add", &[("product_id", "3"), ("buy_now", "1")])
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/checkout"));
}
