//! End-to-end checkout tests against a mocked payment backend.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use glowglaz_integration_tests::{TestClient, shipping_fields, test_app};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client with one product in the cart.
async fn client_with_cart() -> (MockServer, TestClient) {
    let backend = MockServer::start().await;
    let mut client = TestClient::new(test_app(&backend.uri()));
    client
        .post_form("/cart/add", &[("product_id", "4"), ("quantity", "2")])
        .await;
    (backend, client)
}

async fn submit_shipping(client: &mut TestClient) {
    let response = client.post_form("/checkout/shipping", &shipping_fields()).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/checkout"));
}

async fn mock_confirmation_email(backend: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path("/send-order-confirmation"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "success": status == 200 })))
        .mount(backend)
        .await;
}

// =============================================================================
// Step Navigation
// =============================================================================

#[tokio::test]
async fn test_checkout_with_empty_cart_redirects_home() {
    let backend = MockServer::start().await;
    let mut client = TestClient::new(test_app(&backend.uri()));

    let response = client.get("/checkout").await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));
}

#[tokio::test]
async fn test_checkout_starts_at_shipping() {
    let (_backend, mut client) = client_with_cart().await;

    let response = client.get("/checkout").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Shipping details"));
    assert!(response.body.contains("aria-current=\"step\""));
}

#[tokio::test]
async fn test_invalid_shipping_rerenders_with_field_errors() {
    let (_backend, mut client) = client_with_cart().await;

    let response = client
        .post_form(
            "/checkout/shipping",
            &[("first_name", "Asha"), ("email", "not-an-email")],
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Last name is required"));
    assert!(response.body.contains("Email address is invalid"));
    assert!(response.body.contains("value=\"Asha\""));

    // Still on the shipping step
    let page = client.get("/checkout").await;
    assert!(page.body.contains("Shipping details"));
}

#[tokio::test]
async fn test_valid_shipping_moves_to_payment_and_back() {
    let (_backend, mut client) = client_with_cart().await;
    submit_shipping(&mut client).await;

    let payment = client.get("/checkout").await;
    assert_eq!(payment.status, StatusCode::OK);
    assert!(payment.body.contains("Payment method"));
    assert!(payment.body.contains("12 MG Road"));

    let back = client.post_form("/checkout/back", &[]).await;
    assert_eq!(back.status, StatusCode::SEE_OTHER);

    // Shipping form comes back prefilled
    let shipping = client.get("/checkout").await;
    assert!(shipping.body.contains("Shipping details"));
    assert!(shipping.body.contains("value=\"Bengaluru\""));
}

#[tokio::test]
async fn test_payment_before_shipping_is_sent_back() {
    let (_backend, mut client) = client_with_cart().await;

    let response = client
        .post_form("/checkout/payment", &[("payment_method", "cod")])
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/checkout"));
}

#[tokio::test]
async fn test_unknown_payment_method_is_bad_request() {
    let (_backend, mut client) = client_with_cart().await;
    submit_shipping(&mut client).await;

    let response = client
        .post_form("/checkout/payment", &[("payment_method", "paypal")])
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Cash on Delivery and Card
// =============================================================================

#[tokio::test]
async fn test_cash_on_delivery_places_order() {
    let (backend, mut client) = client_with_cart().await;
    Mock::given(method("POST"))
        .and(path("/send-order-confirmation"))
        .and(body_partial_json(json!({
            "customerEmail": "asha@example.in",
            "orderDetails": {
                "paymentMethod": "Cash on Delivery",
                "paymentId": "COD",
                "quantity": 2
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&backend)
        .await;
    submit_shipping(&mut client).await;

    let placed = client
        .post_form("/checkout/payment", &[("payment_method", "cod")])
        .await;
    assert_eq!(placed.status, StatusCode::SEE_OTHER);
    assert_eq!(placed.location(), Some("/checkout/confirmation"));

    let confirmation = client.get("/checkout/confirmation").await;
    assert_eq!(confirmation.status, StatusCode::OK);
    assert!(confirmation.body.contains("Thank you for your order!"));
    assert!(confirmation.body.contains("Cash on Delivery"));
    assert!(confirmation.body.contains("A confirmation has been sent to asha@example.in"));

    // Cart is empty, so checkout now points at the confirmation
    let count = client.get("/cart/count").await;
    assert!(!count.body.contains("badge"));
    let checkout = client.get("/checkout").await;
    assert_eq!(checkout.location(), Some("/checkout/confirmation"));
}

#[tokio::test]
async fn test_failed_confirmation_email_still_places_order() {
    let (backend, mut client) = client_with_cart().await;
    mock_confirmation_email(&backend, 500).await;
    submit_shipping(&mut client).await;

    let placed = client
        .post_form("/checkout/payment", &[("payment_method", "cod")])
        .await;
    assert_eq!(placed.location(), Some("/checkout/confirmation"));

    let confirmation = client.get("/checkout/confirmation").await;
    assert!(confirmation.body.contains("Your confirmation email is delayed"));
}

#[tokio::test]
async fn test_card_payment_validates_fields() {
    let (_backend, mut client) = client_with_cart().await;
    submit_shipping(&mut client).await;

    let response = client
        .post_form(
            "/checkout/payment",
            &[
                ("payment_method", "card"),
                ("card_name", "Asha Rao"),
                ("card_number", "1234"),
                ("expiry_date", "13-25"),
                ("cvv", ""),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Invalid card number"));
    assert!(response.body.contains("Use format MM/YY"));
    assert!(response.body.contains("CVV is required"));
    assert!(response.body.contains("value=\"Asha Rao\""));
}

#[tokio::test]
async fn test_card_payment_places_order() {
    let (backend, mut client) = client_with_cart().await;
    mock_confirmation_email(&backend, 200).await;
    submit_shipping(&mut client).await;

    let placed = client
        .post_form(
            "/checkout/payment",
            &[
                ("payment_method", "card"),
                ("card_name", "Asha Rao"),
                ("card_number", "4111 1111 1111 1111"),
                ("expiry_date", "12/29"),
                ("cvv", "123"),
            ],
        )
        .await;
    assert_eq!(placed.location(), Some("/checkout/confirmation"));

    let confirmation = client.get("/checkout/confirmation").await;
    assert!(confirmation.body.contains("Credit Card"));
    assert!(confirmation.body.contains("CARD-PAYMENT"));
}

// =============================================================================
// Gateway Payments
// =============================================================================

async fn mock_health(backend: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/server-metrics"))
        .respond_with(ResponseTemplate::new(status))
        .mount(backend)
        .await;
}

/// Healthy backend that creates `order_Test123` for `amount` paise.
async fn mock_create_order_for(backend: &MockServer, amount: i64) {
    mock_health(backend, 200).await;
    Mock::given(method("POST"))
        .and(path("/create-order"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "order": { "id": "order_Test123", "amount": amount, "currency": "INR" },
            "key": "rzp_test_key"
        })))
        .expect(1)
        .mount(backend)
        .await;
}

/// Two lotions at ₹1,499 plus ₹99 shipping.
async fn mock_create_order(backend: &MockServer) {
    mock_create_order_for(backend, 309_700).await;
}

async fn start_gateway(client: &mut TestClient) {
    let response = client
        .post_form("/checkout/payment", &[("payment_method", "razorpay")])
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("data-order-id=\"order_Test123\""));
    assert!(response.body.contains("data-key=\"rzp_test_key\""));
}

fn verification(order_id: &str) -> Vec<(&'static str, String)> {
    vec![
        ("razorpay_payment_id", "pay_Test456".to_owned()),
        ("razorpay_order_id", order_id.to_owned()),
        ("razorpay_signature", "sig".to_owned()),
    ]
}

async fn post_verification(client: &mut TestClient, order_id: &str) -> glowglaz_integration_tests::TestResponse {
    let fields = verification(order_id);
    let pairs: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
    client.post_form("/checkout/payment/verify", &pairs).await
}

#[tokio::test]
async fn test_gateway_payment_verified_places_order() {
    let (backend, mut client) = client_with_cart().await;
    mock_create_order(&backend).await;
    Mock::given(method("POST"))
        .and(path("/verify-payment"))
        .and(body_partial_json(json!({ "razorpay_order_id": "order_Test123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&backend)
        .await;
    mock_confirmation_email(&backend, 200).await;
    submit_shipping(&mut client).await;
    start_gateway(&mut client).await;

    // Reloading keeps the pending gateway order
    let reload = client.get("/checkout").await;
    assert!(reload.body.contains("data-order-id=\"order_Test123\""));

    let verified = post_verification(&mut client, "order_Test123").await;
    assert_eq!(verified.status, StatusCode::SEE_OTHER);
    assert_eq!(verified.location(), Some("/checkout/confirmation"));

    let confirmation = client.get("/checkout/confirmation").await;
    assert!(confirmation.body.contains("Razorpay"));
    assert!(confirmation.body.contains("pay_Test456"));
}

#[tokio::test]
async fn test_gateway_payment_declined_shows_error() {
    let (backend, mut client) = client_with_cart().await;
    mock_create_order(&backend).await;
    Mock::given(method("POST"))
        .and(path("/verify-payment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&backend)
        .await;
    submit_shipping(&mut client).await;
    start_gateway(&mut client).await;

    let declined = post_verification(&mut client, "order_Test123").await;

    assert_eq!(declined.status, StatusCode::PAYMENT_REQUIRED);
    assert!(declined.body.contains("Payment verification failed. Please contact support."));
    // Cart is untouched
    assert!(declined.body.contains("PSORIGO Body Lotion"));
}

#[tokio::test]
async fn test_gateway_verification_for_other_order_is_rejected() {
    let (backend, mut client) = client_with_cart().await;
    mock_create_order(&backend).await;
    Mock::given(method("POST"))
        .and(path("/verify-payment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(0)
        .mount(&backend)
        .await;
    submit_shipping(&mut client).await;
    start_gateway(&mut client).await;

    let response = post_verification(&mut client, "order_Forged").await;

    assert_eq!(response.status, StatusCode::PAYMENT_REQUIRED);
}

#[tokio::test]
async fn test_gateway_order_failure_shows_retry_message() {
    let (backend, mut client) = client_with_cart().await;
    mock_health(&backend, 200).await;
    Mock::given(method("POST"))
        .and(path("/create-order"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "gateway unavailable"
        })))
        .mount(&backend)
        .await;
    submit_shipping(&mut client).await;

    let response = client
        .post_form("/checkout/payment", &[("payment_method", "razorpay")])
        .await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert!(response.body.contains("Failed to create order. Please try again."));
}

#[tokio::test]
async fn test_unreachable_backend_blocks_gateway_payment() {
    let (backend, mut client) = client_with_cart().await;
    mock_health(&backend, 503).await;
    Mock::given(method("POST"))
        .and(path("/create-order"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend)
        .await;
    submit_shipping(&mut client).await;

    let response = client
        .post_form("/checkout/payment", &[("payment_method", "razorpay")])
        .await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(response.body.contains(
        "Cannot connect to payment server. Please try another payment method or try again later."
    ));
    // Other methods stay available on the same step
    assert!(response.body.contains("Payment method"));
}

#[tokio::test]
async fn test_cart_change_after_gateway_order_is_not_confirmed() {
    let (backend, mut client) = client_with_cart().await;
    mock_create_order(&backend).await;
    Mock::given(method("POST"))
        .and(path("/verify-payment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(0)
        .mount(&backend)
        .await;
    Mock::given(method("POST"))
        .and(path("/send-order-confirmation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(0)
        .mount(&backend)
        .await;
    submit_shipping(&mut client).await;
    start_gateway(&mut client).await;

    let added = client
        .post_form("/cart/add", &[("product_id", "1"), ("quantity", "5")])
        .await;
    assert_eq!(added.status, StatusCode::OK);

    // The order priced for the old cart is gone
    let page = client.get("/checkout").await;
    assert!(page.body.contains("Payment method"));
    assert!(!page.body.contains("data-order-id=\"order_Test123\""));

    let response = post_verification(&mut client, "order_Test123").await;
    assert_eq!(response.status, StatusCode::PAYMENT_REQUIRED);
    assert!(response.body.contains("Sampoorn Arogya"));
}

#[tokio::test]
async fn test_gateway_order_for_other_amount_is_rejected() {
    let (backend, mut client) = client_with_cart().await;
    mock_create_order_for(&backend, 159_800).await;
    Mock::given(method("POST"))
        .and(path("/verify-payment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(0)
        .mount(&backend)
        .await;
    submit_shipping(&mut client).await;
    start_gateway(&mut client).await;

    let response = post_verification(&mut client, "order_Test123").await;

    assert_eq!(response.status, StatusCode::PAYMENT_REQUIRED);
    assert!(response.body.contains("Payment verification failed. Please contact support."));
}
