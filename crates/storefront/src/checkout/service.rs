//! Order placement.
//!
//! Talks to the payment backend and keeps the pending-checkout snapshot in
//! step with the visitor's session. The caller owns the session and saves
//! the mutated cart and checkout afterwards.

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use tracing::instrument;

use super::{
    CheckoutError, CheckoutSession, OrderConfirmation, OrderReference, OrderSummary,
    PendingGatewayOrder, delivery_window,
};
use crate::cart::Cart;
use crate::db::{PendingCheckoutRepository, PendingEmailRepository};
use crate::payments::{
    CreateOrderRequest, CreatedOrder, OrderEmail, PaymentBackendClient, PaymentVerification,
};

/// Payment id recorded for cash on delivery orders.
pub const COD_PAYMENT_ID: &str = "COD";

/// Payment id recorded for card orders.
pub const CARD_PAYMENT_ID: &str = "CARD-PAYMENT";

impl From<CreatedOrder> for PendingGatewayOrder {
    fn from(created: CreatedOrder) -> Self {
        Self {
            order_id: created.order.id,
            key_id: created.key_id,
            amount: created.order.amount,
            currency: created.order.currency,
        }
    }
}

/// Checkout operations that reach outside the session.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
    payments: &'a PaymentBackendClient,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, payments: &'a PaymentBackendClient) -> Self {
        Self { pool, payments }
    }

    /// Write (or drop) the abandonment snapshot for this checkout.
    ///
    /// Best effort: failures are logged and swallowed.
    #[instrument(skip_all, fields(checkout_id = %checkout.id))]
    pub async fn sync_snapshot(&self, checkout: &CheckoutSession, cart: &Cart) {
        let repo = PendingCheckoutRepository::new(self.pool);
        let result = if cart.is_empty() {
            repo.delete(checkout.id).await.map(|_| ())
        } else {
            repo.upsert(checkout.id, cart, checkout.shipping.as_ref())
                .await
        };

        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to update pending checkout snapshot");
        }
    }

    /// Create a gateway order for the current cart and attach it to the checkout.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError` if shipping is missing, the cart is empty,
    /// the checkout is not at the payment step or the backend refuses.
    #[instrument(skip_all, fields(checkout_id = %checkout.id))]
    pub async fn start_gateway_payment(
        &self,
        checkout: &mut CheckoutSession,
        cart: &Cart,
    ) -> Result<PendingGatewayOrder, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let shipping = checkout
            .shipping
            .as_ref()
            .ok_or(CheckoutError::MissingShipping)?;

        let summary = OrderSummary::for_cart(cart);
        let request = CreateOrderRequest::new(summary.total, shipping, Utc::now().timestamp_millis());
        let pending = PendingGatewayOrder::from(self.payments.create_order(&request).await?);

        checkout.attach_gateway_order(pending.clone())?;
        Ok(pending)
    }

    /// Verify the gateway's callback and place the order.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::OrderMismatch` if the callback is for a
    /// different order or the cart no longer matches the amount the order
    /// was created for, `CheckoutError::PaymentDeclined` if the backend
    /// rejects the signature, or a backend error.
    #[instrument(skip_all, fields(checkout_id = %checkout.id, order_id = %verification.razorpay_order_id))]
    pub async fn confirm_gateway_payment(
        &self,
        checkout: &mut CheckoutSession,
        cart: &mut Cart,
        verification: &PaymentVerification,
        today: NaiveDate,
    ) -> Result<OrderConfirmation, CheckoutError> {
        let expected = checkout
            .gateway_order
            .as_ref()
            .ok_or(CheckoutError::OrderMismatch)?;
        if expected.order_id != verification.razorpay_order_id {
            return Err(CheckoutError::OrderMismatch);
        }
        if !expected.covers(OrderSummary::for_cart(cart).total) {
            tracing::warn!(amount = expected.amount, "Cart changed after the gateway order was created");
            return Err(CheckoutError::OrderMismatch);
        }

        if !self.payments.verify_payment(verification).await? {
            tracing::warn!("Payment verification failed");
            return Err(CheckoutError::PaymentDeclined);
        }

        self.complete_order(
            checkout,
            cart,
            verification.razorpay_payment_id.clone(),
            today,
        )
        .await
    }

    /// Place the order: send the confirmation email (queueing it on
    /// failure), clear the cart and drop the abandonment snapshot.
    ///
    /// Email and snapshot failures never fail the order.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError` if the cart is empty, shipping is missing or
    /// the checkout is not at the payment step.
    #[instrument(skip_all, fields(checkout_id = %checkout.id, method = ?checkout.payment_method))]
    pub async fn complete_order(
        &self,
        checkout: &mut CheckoutSession,
        cart: &mut Cart,
        payment_id: String,
        today: NaiveDate,
    ) -> Result<OrderConfirmation, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let shipping = checkout
            .shipping
            .clone()
            .ok_or(CheckoutError::MissingShipping)?;
        checkout.complete()?;

        let summary = OrderSummary::for_cart(cart);
        let reference = OrderReference::generate();
        let email = OrderEmail::confirmation(
            reference.as_str(),
            cart,
            summary.total,
            checkout.payment_method,
            &payment_id,
            &shipping,
        );
        let email_queued = !self.send_confirmation(&email).await;

        let confirmation = OrderConfirmation {
            reference,
            payment_id,
            method: checkout.payment_method,
            summary,
            lines: cart.lines().to_vec(),
            email: shipping.email.to_string(),
            delivery_window: delivery_window(today),
            email_queued,
        };

        cart.clear();
        if let Err(e) = PendingCheckoutRepository::new(self.pool)
            .delete(checkout.id)
            .await
        {
            tracing::warn!(error = %e, "Failed to delete pending checkout snapshot");
        }

        tracing::info!(reference = %confirmation.reference, total = %summary.total, "Order placed");
        Ok(confirmation)
    }

    /// Send the confirmation email. Returns whether it was delivered; on
    /// failure the payload is queued for manual retry.
    async fn send_confirmation(&self, email: &OrderEmail) -> bool {
        match self.payments.send_order_confirmation(email).await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    order_number = %email.order_details.order_number,
                    "Failed to send order confirmation, queueing for retry"
                );
                if let Err(queue_err) = PendingEmailRepository::new(self.pool)
                    .enqueue(email, &e.to_string())
                    .await
                {
                    tracing::error!(error = %queue_err, "Failed to queue order confirmation");
                }
                false
            }
        }
    }
}
