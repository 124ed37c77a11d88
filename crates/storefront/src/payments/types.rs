//! Request and response bodies for the payment backend.

use glowglaz_core::{Money, PaymentMethod};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::checkout::ShippingDetails;

/// Customer details attached to a gateway order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderNotes {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
}

/// `POST /create-order` body.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderRequest {
    /// Order total in rupees.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    pub receipt: String,
    pub notes: OrderNotes,
}

impl CreateOrderRequest {
    /// Build an order for `total`, receipted at `now_millis`.
    #[must_use]
    pub fn new(total: Money, shipping: &ShippingDetails, now_millis: i64) -> Self {
        Self {
            amount: total.amount(),
            currency: Money::CURRENCY_CODE.to_owned(),
            receipt: format!("receipt_{now_millis}"),
            notes: OrderNotes {
                customer_name: shipping.full_name(),
                customer_email: shipping.email.to_string(),
                customer_phone: shipping.phone.clone(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateOrderResponse {
    #[serde(default)]
    pub success: bool,
    pub order: Option<GatewayOrder>,
    pub key: Option<String>,
    pub message: Option<String>,
}

/// Order as created by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    /// Amount in paise.
    pub amount: i64,
    pub currency: String,
}

/// A gateway order plus the public key the browser modal needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedOrder {
    pub order: GatewayOrder,
    pub key_id: String,
}

/// Fields the gateway modal hands back after a payment, passed through verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentVerification {
    pub razorpay_payment_id: String,
    pub razorpay_order_id: String,
    pub razorpay_signature: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct VerifyPaymentResponse {
    #[serde(default)]
    pub success: bool,
}

/// Order section of a transactional email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    pub order_number: String,
    /// Comma-separated product titles.
    pub product_name: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
}

/// Customer section of a transactional email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl From<&ShippingDetails> for CustomerDetails {
    fn from(shipping: &ShippingDetails) -> Self {
        Self {
            first_name: shipping.first_name.clone(),
            last_name: shipping.last_name.clone(),
            email: shipping.email.to_string(),
            phone: shipping.phone.clone(),
            address: shipping.address.clone(),
            city: shipping.city.clone(),
            state: shipping.state.clone(),
            zip: shipping.pincode.clone(),
        }
    }
}

/// Body shared by the confirmation and abandoned-cart email endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEmail {
    pub customer_email: String,
    pub order_details: OrderDetails,
    pub customer_details: CustomerDetails,
}

impl OrderEmail {
    /// Confirmation for a placed order.
    #[must_use]
    pub fn confirmation(
        order_number: &str,
        cart: &Cart,
        total: Money,
        method: PaymentMethod,
        payment_id: &str,
        shipping: &ShippingDetails,
    ) -> Self {
        Self::build(
            OrderDetails {
                order_number: order_number.to_owned(),
                product_name: cart.titles(),
                quantity: cart.item_count(),
                total_amount: total.amount(),
                currency: Money::SYMBOL.to_owned(),
                payment_method: Some(method.label().to_owned()),
                payment_id: Some(payment_id.to_owned()),
            },
            shipping,
        )
    }

    /// Reminder for a checkout left unfinished, numbered `PENDING-<millis>`.
    #[must_use]
    pub fn abandoned(cart: &Cart, total: Money, shipping: &ShippingDetails, now_millis: i64) -> Self {
        Self::build(
            OrderDetails {
                order_number: format!("PENDING-{now_millis}"),
                product_name: cart.titles(),
                quantity: cart.item_count(),
                total_amount: total.amount(),
                currency: Money::SYMBOL.to_owned(),
                payment_method: None,
                payment_id: None,
            },
            shipping,
        )
    }

    fn build(order_details: OrderDetails, shipping: &ShippingDetails) -> Self {
        Self {
            customer_email: shipping.email.to_string(),
            order_details,
            customer_details: CustomerDetails::from(shipping),
        }
    }
}
