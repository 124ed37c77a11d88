//! Client for the payment backend.
//!
//! The backend owns the gateway credentials: it creates gateway orders,
//! checks payment signatures and sends transactional emails. Everything is
//! plain JSON over HTTP.

mod types;

use std::time::Duration;

use thiserror::Error;
use tracing::instrument;

use crate::config::PaymentConfig;

pub use types::{
    CreateOrderRequest, CreatedOrder, CustomerDetails, GatewayOrder, OrderDetails, OrderEmail,
    OrderNotes, PaymentVerification,
};

/// Errors that can occur when talking to the payment backend.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP request failed (connection, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Backend answered but declined the request.
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Payment backend API client.
#[derive(Debug, Clone)]
pub struct PaymentBackendClient {
    client: reqwest::Client,
    base_url: String,
    email_timeout: Duration,
}

impl PaymentBackendClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &PaymentConfig) -> Result<Self, PaymentError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("glowglaz-storefront/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.as_str().trim_end_matches('/').to_owned(),
            email_timeout: config.email_timeout,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Whether the backend is reachable. Never fails.
    #[instrument(skip(self))]
    pub async fn check_connection(&self) -> bool {
        match self.client.get(self.url("server-metrics")).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::warn!(status = %response.status(), "Payment backend health check failed");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "Payment backend unreachable");
                false
            }
        }
    }

    /// Create a gateway order for the customer to pay in the browser modal.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend reports
    /// `success: false`.
    #[instrument(skip(self, request), fields(receipt = %request.receipt))]
    pub async fn create_order(
        &self,
        request: &CreateOrderRequest,
    ) -> Result<CreatedOrder, PaymentError> {
        let response = self
            .client
            .post(self.url("create-order"))
            .json(request)
            .send()
            .await?;
        let body: types::CreateOrderResponse = Self::parse(response).await?;

        match body {
            types::CreateOrderResponse {
                success: true,
                order: Some(order),
                key: Some(key_id),
                ..
            } => {
                tracing::info!(order_id = %order.id, "Gateway order created");
                Ok(CreatedOrder { order, key_id })
            }
            types::CreateOrderResponse { success: true, .. } => Err(PaymentError::Parse(
                "order or key missing from create-order response".to_string(),
            )),
            types::CreateOrderResponse { message, .. } => Err(PaymentError::Rejected(
                message.unwrap_or_else(|| "Failed to create order".to_string()),
            )),
        }
    }

    /// Ask the backend to check a payment's signature.
    ///
    /// Returns `false` when the backend says the payment is not genuine.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self, verification), fields(order_id = %verification.razorpay_order_id))]
    pub async fn verify_payment(
        &self,
        verification: &PaymentVerification,
    ) -> Result<bool, PaymentError> {
        let response = self
            .client
            .post(self.url("verify-payment"))
            .json(verification)
            .send()
            .await?;
        let body: types::VerifyPaymentResponse = Self::parse(response).await?;
        Ok(body.success)
    }

    /// Send the order confirmation email. Bounded by the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, times out or gets a non-success
    /// status.
    #[instrument(skip(self, email), fields(order_number = %email.order_details.order_number))]
    pub async fn send_order_confirmation(
        &self,
        email: &OrderEmail,
    ) -> Result<serde_json::Value, PaymentError> {
        let response = self
            .client
            .post(self.url("send-order-confirmation"))
            .timeout(self.email_timeout)
            .json(email)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Send an abandoned-cart reminder.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or gets a non-success status.
    #[instrument(skip(self, email))]
    pub async fn send_abandoned_cart_email(
        &self,
        email: &OrderEmail,
    ) -> Result<serde_json::Value, PaymentError> {
        let response = self
            .client
            .post(self.url("send-abandoned-order-email"))
            .json(email)
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, PaymentError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PaymentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| PaymentError::Parse(e.to_string()))
    }
}
