//! Checkout flow: shipping → payment → confirmation.
//!
//! [`CheckoutSession`] is the per-visitor state machine kept in the session.
//! It only moves forward through validated form submissions and only moves
//! back one step at a time. Completing an order is orchestrated by
//! [`CheckoutService`].

mod service;
mod validation;

use chrono::{Days, NaiveDate};
use glowglaz_core::{CheckoutStep, Money, PaymentMethod};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use uuid::Uuid;

use crate::cart::{Cart, CartLineItem};
use crate::models::session_keys;
use crate::payments::PaymentError;

pub use service::{CARD_PAYMENT_ID, COD_PAYMENT_ID, CheckoutService};
pub use validation::{CardForm, ShippingDetails, ShippingForm, ValidationErrors};

/// Orders strictly above this subtotal ship free.
pub const FREE_SHIPPING_THRESHOLD: i64 = 3000;

/// Flat shipping fee below the free-shipping threshold.
pub const SHIPPING_FEE: i64 = 99;

/// Errors from checkout state transitions and order placement.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// The action is not valid at the current step.
    #[error("cannot {action} during the {step:?} step")]
    WrongStep {
        action: &'static str,
        step: CheckoutStep,
    },

    /// Checkout was reached with nothing in the cart.
    #[error("cart is empty")]
    EmptyCart,

    /// Payment was attempted before shipping details were entered.
    #[error("shipping details missing")]
    MissingShipping,

    /// The gateway callback does not match the order we created.
    #[error("payment does not match the pending order")]
    OrderMismatch,

    /// The backend did not accept the payment signature.
    #[error("payment verification failed")]
    PaymentDeclined,

    /// Talking to the payment backend failed.
    #[error(transparent)]
    Payment(#[from] PaymentError),
}

/// Subtotal, shipping and total for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub subtotal: Money,
    pub shipping: Money,
    pub total: Money,
}

impl OrderSummary {
    /// Price a cart.
    #[must_use]
    pub fn for_cart(cart: &Cart) -> Self {
        Self::for_subtotal(cart.subtotal())
    }

    /// Price a subtotal.
    #[must_use]
    pub fn for_subtotal(subtotal: Money) -> Self {
        let shipping = if subtotal > Money::rupees(FREE_SHIPPING_THRESHOLD) {
            Money::ZERO
        } else {
            Money::rupees(SHIPPING_FEE)
        };
        Self {
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }

    #[must_use]
    pub fn free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

/// Customer-facing order number, `GG-` followed by six digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderReference(String);

impl OrderReference {
    /// Generate a random reference.
    #[must_use]
    pub fn generate() -> Self {
        let number: u32 = rand::rng().random_range(100_000..1_000_000);
        Self(format!("GG-{number}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Estimated delivery range: 5 to 7 days after `ordered_on`, e.g. `24 Oct - 26 Oct`.
#[must_use]
pub fn delivery_window(ordered_on: NaiveDate) -> String {
    let format = |days: u64| {
        ordered_on
            .checked_add_days(Days::new(days))
            .map_or_else(String::new, |date| date.format("%-d %b").to_string())
    };
    format!("{} - {}", format(5), format(7))
}

/// A completed order, kept in the session for the confirmation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub reference: OrderReference,
    /// Gateway payment id, or `COD` / `CARD-PAYMENT`.
    pub payment_id: String,
    pub method: PaymentMethod,
    pub summary: OrderSummary,
    pub lines: Vec<CartLineItem>,
    pub email: String,
    pub delivery_window: String,
    /// Whether the confirmation email was queued for retry instead of sent.
    pub email_queued: bool,
}

/// Gateway order awaiting the customer's payment in the hosted modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingGatewayOrder {
    pub order_id: String,
    pub key_id: String,
    /// Amount in the gateway's minor unit (paise).
    pub amount: i64,
    pub currency: String,
}

impl PendingGatewayOrder {
    /// Whether this order was created for exactly `total`.
    #[must_use]
    pub fn covers(&self, total: Money) -> bool {
        total.paise() == Some(self.amount)
    }
}

/// Per-visitor checkout state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Keys the abandoned-checkout snapshot.
    pub id: Uuid,
    pub step: CheckoutStep,
    pub shipping: Option<ShippingDetails>,
    pub payment_method: PaymentMethod,
    pub gateway_order: Option<PendingGatewayOrder>,
}

impl Default for CheckoutSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutSession {
    /// A fresh checkout at the shipping step.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            step: CheckoutStep::Shipping,
            shipping: None,
            payment_method: PaymentMethod::default(),
            gateway_order: None,
        }
    }

    /// Validate shipping details and move to the payment step.
    ///
    /// Shipping can be resubmitted from the payment step (after going back).
    ///
    /// # Errors
    ///
    /// Returns field messages when the form is invalid; the step is unchanged.
    pub fn submit_shipping(&mut self, form: &ShippingForm) -> Result<(), ValidationErrors> {
        let details = form.validate()?;
        self.shipping = Some(details);
        self.step = CheckoutStep::Payment;
        Ok(())
    }

    /// Choose how to pay.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::WrongStep`] outside the payment step.
    pub fn select_payment(&mut self, method: PaymentMethod) -> Result<(), CheckoutError> {
        self.require_step(CheckoutStep::Payment, "choose a payment method")?;
        if method != self.payment_method {
            self.gateway_order = None;
        }
        self.payment_method = method;
        Ok(())
    }

    /// Remember the gateway order created for the payment modal.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::WrongStep`] outside the payment step.
    pub fn attach_gateway_order(&mut self, order: PendingGatewayOrder) -> Result<(), CheckoutError> {
        self.require_step(CheckoutStep::Payment, "start a gateway payment")?;
        self.gateway_order = Some(order);
        Ok(())
    }

    /// Go back one step. Confirmation is final and shipping is the first step.
    pub fn back(&mut self) {
        if self.step == CheckoutStep::Payment {
            self.step = CheckoutStep::Shipping;
            self.gateway_order = None;
        }
    }

    /// Mark the order as placed.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::WrongStep`] outside the payment step.
    pub fn complete(&mut self) -> Result<(), CheckoutError> {
        self.require_step(CheckoutStep::Payment, "place an order")?;
        self.step = CheckoutStep::Confirmation;
        self.gateway_order = None;
        Ok(())
    }

    /// Email entered on the shipping step, if any.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.shipping.as_ref().map(|s| s.email.as_str())
    }

    fn require_step(&self, step: CheckoutStep, action: &'static str) -> Result<(), CheckoutError> {
        if self.step == step {
            Ok(())
        } else {
            Err(CheckoutError::WrongStep {
                action,
                step: self.step,
            })
        }
    }
}

/// Load the checkout state, starting a new one if none is stored.
pub async fn load(session: &Session) -> CheckoutSession {
    match session.get::<CheckoutSession>(session_keys::CHECKOUT).await {
        Ok(Some(checkout)) => checkout,
        Ok(None) => CheckoutSession::new(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read checkout from session, restarting");
            CheckoutSession::new()
        }
    }
}

/// The stored checkout, if the visitor has started one.
pub async fn current(session: &Session) -> Option<CheckoutSession> {
    session
        .get::<CheckoutSession>(session_keys::CHECKOUT)
        .await
        .ok()
        .flatten()
}

/// Persist the checkout state.
///
/// # Errors
///
/// Returns the session store error if the state cannot be written.
pub async fn save(
    session: &Session,
    checkout: &CheckoutSession,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CHECKOUT, checkout).await
}

/// Drop the checkout state so the next visit starts fresh.
///
/// # Errors
///
/// Returns the session store error if the state cannot be removed.
pub async fn reset(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CheckoutSession>(session_keys::CHECKOUT)
        .await
        .map(|_| ())
}

/// Store the confirmation shown after a completed order.
///
/// # Errors
///
/// Returns the session store error if the confirmation cannot be written.
pub async fn store_confirmation(
    session: &Session,
    confirmation: &OrderConfirmation,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::LAST_ORDER, confirmation)
        .await
}

/// The most recent confirmation, if any.
pub async fn last_confirmation(session: &Session) -> Option<OrderConfirmation> {
    session
        .get::<OrderConfirmation>(session_keys::LAST_ORDER)
        .await
        .ok()
        .flatten()
}
