//! Integration tests for the payment backend client.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::time::Duration;

use glowglaz_core::{Email, Money, PaymentMethod, ProductId};
use glowglaz_storefront::cart::{Cart, CartLineItem};
use glowglaz_storefront::checkout::ShippingDetails;
use glowglaz_storefront::config::PaymentConfig;
use glowglaz_storefront::payments::{
    CreateOrderRequest, OrderEmail, PaymentBackendClient, PaymentError, PaymentVerification,
};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(backend: &MockServer) -> PaymentBackendClient {
    let mut config = PaymentConfig::new(Url::parse(&backend.uri()).expect("mock server URL"));
    config.email_timeout = Duration::from_millis(200);
    PaymentBackendClient::new(&config).expect("client builds")
}

fn shipping() -> ShippingDetails {
    ShippingDetails {
        first_name: "Asha".to_owned(),
        last_name: "Rao".to_owned(),
        email: Email::parse("asha@example.in").expect("valid email"),
        phone: "9876543210".to_owned(),
        address: "12 MG Road".to_owned(),
        city: "Bengaluru".to_owned(),
        state: "Karnataka".to_owned(),
        pincode: "560001".to_owned(),
    }
}

fn cart() -> Cart {
    let mut cart = Cart::new();
    cart.add(CartLineItem {
        id: ProductId::new(4),
        title: "PSORIGO Body Lotion".to_owned(),
        price: Money::rupees(1499),
        image: "/static/images/placeholder.png".to_owned(),
        quantity: 2,
    });
    cart
}

fn confirmation_email() -> OrderEmail {
    OrderEmail::confirmation(
        "482913",
        &cart(),
        Money::rupees(3097),
        PaymentMethod::CashOnDelivery,
        "COD",
        &shipping(),
    )
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn test_create_order_sends_rupee_amount_and_returns_key() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/create-order"))
        .and(body_partial_json(json!({
            "amount": 3097.0,
            "currency": "INR",
            "receipt": "receipt_1760000000000",
            "notes": { "customerName": "Asha Rao", "customerPhone": "9876543210" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "order": { "id": "order_1", "amount": 309_700, "currency": "INR" },
            "key": "rzp_test_key"
        })))
        .expect(1)
        .mount(&backend)
        .await;

    let request = CreateOrderRequest::new(Money::rupees(3097), &shipping(), 1_760_000_000_000);
    let created = client(&backend).create_order(&request).await.expect("order created");

    assert_eq!(created.order.id, "order_1");
    assert_eq!(created.order.amount, 309_700);
    assert_eq!(created.key_id, "rzp_test_key");
}

#[tokio::test]
async fn test_create_order_rejected_carries_message() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/create-order"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "amount too low"
        })))
        .mount(&backend)
        .await;

    let request = CreateOrderRequest::new(Money::rupees(1), &shipping(), 0);
    let err = client(&backend).create_order(&request).await.unwrap_err();

    assert!(matches!(err, PaymentError::Rejected(ref m) if m == "amount too low"));
}

#[tokio::test]
async fn test_create_order_http_error_is_api_error() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/create-order"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .mount(&backend)
        .await;

    let request = CreateOrderRequest::new(Money::rupees(100), &shipping(), 0);
    let err = client(&backend).create_order(&request).await.unwrap_err();

    assert!(matches!(err, PaymentError::Api { status: 503, ref message } if message == "down"));
}

#[tokio::test]
async fn test_verify_payment_reports_backend_verdict() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/verify-payment"))
        .and(body_partial_json(json!({ "razorpay_payment_id": "pay_ok" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&backend)
        .await;
    Mock::given(method("POST"))
        .and(path("/verify-payment"))
        .and(body_partial_json(json!({ "razorpay_payment_id": "pay_bad" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&backend)
        .await;
    let client = client(&backend);

    let verification = |payment_id: &str| PaymentVerification {
        razorpay_payment_id: payment_id.to_owned(),
        razorpay_order_id: "order_1".to_owned(),
        razorpay_signature: "sig".to_owned(),
    };

    assert!(client.verify_payment(&verification("pay_ok")).await.expect("verified"));
    assert!(!client.verify_payment(&verification("pay_bad")).await.expect("answered"));
}

// =============================================================================
// Emails
// =============================================================================

#[tokio::test]
async fn test_order_confirmation_payload_shape() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send-order-confirmation"))
        .and(body_partial_json(json!({
            "customerEmail": "asha@example.in",
            "orderDetails": {
                "orderNumber": "482913",
                "productName": "PSORIGO Body Lotion",
                "quantity": 2,
                "totalAmount": 3097.0,
                "paymentMethod": "Cash on Delivery",
                "paymentId": "COD"
            },
            "customerDetails": { "firstName": "Asha", "zip": "560001" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&backend)
        .await;

    let response = client(&backend)
        .send_order_confirmation(&confirmation_email())
        .await
        .expect("email sent");

    assert_eq!(response["success"], json!(true));
}

#[tokio::test]
async fn test_order_confirmation_times_out() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send-order-confirmation"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&backend)
        .await;

    let err = client(&backend)
        .send_order_confirmation(&confirmation_email())
        .await
        .unwrap_err();

    assert!(matches!(err, PaymentError::Http(ref e) if e.is_timeout()));
}

#[tokio::test]
async fn test_abandoned_cart_email_omits_payment_fields() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send-abandoned-order-email"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&backend)
        .await;

    let email = OrderEmail::abandoned(&cart(), Money::rupees(3097), &shipping(), 1_760_000_000_000);
    client(&backend)
        .send_abandoned_cart_email(&email)
        .await
        .expect("reminder sent");

    let requests = backend.received_requests().await.expect("recording enabled");
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).expect("JSON body");
    assert_eq!(body["orderDetails"]["orderNumber"], "PENDING-1760000000000");
    assert!(body["orderDetails"].get("paymentMethod").is_none());
    assert!(body["orderDetails"].get("paymentId").is_none());
}

#[tokio::test]
async fn test_check_connection() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/server-metrics"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&backend)
        .await;

    assert!(client(&backend).check_connection().await);

    let unreachable = PaymentBackendClient::new(&PaymentConfig::new(
        Url::parse("http://127.0.0.1:1").expect("static URL"),
    ))
    .expect("client builds");
    assert!(!unreachable.check_connection().await);
}
