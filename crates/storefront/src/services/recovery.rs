//! Abandoned checkout recovery.
//!
//! A background task periodically looks for checkout snapshots that have an
//! email address but went idle, and sends each customer one reminder. The
//! reminder is non-critical: send failures are logged and the snapshot is
//! retried on the next sweep.

use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio::task::JoinHandle;
use tracing::instrument;

use crate::checkout::OrderSummary;
use crate::config::RecoveryConfig;
use crate::db::{PendingCheckout, PendingCheckoutRepository, RepositoryError};
use crate::payments::{OrderEmail, PaymentBackendClient};

/// Maximum reminders sent per sweep.
const SWEEP_BATCH_SIZE: i64 = 50;

/// What happened to one abandoned checkout during a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Reminder delivered.
    Sent,
    /// Backend refused or was unreachable; retried next sweep.
    Failed,
    /// Nothing to send (no shipping details or an empty cart).
    Skipped,
}

impl Outcome {
    /// Whether the snapshot should be marked notified and left alone.
    #[must_use]
    pub const fn settled(self) -> bool {
        !matches!(self, Self::Failed)
    }
}

/// Totals for one sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl SweepReport {
    /// Count one checkout's outcome.
    pub const fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Sent => self.sent += 1,
            Outcome::Failed => self.failed += 1,
            Outcome::Skipped => self.skipped += 1,
        }
    }
}

/// Spawn the sweeper. Abort the returned handle to stop it.
#[must_use]
pub fn spawn_sweeper(
    pool: PgPool,
    payments: PaymentBackendClient,
    config: RecoveryConfig,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(config.sweep_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        tracing::info!(
            abandon_after_secs = config.abandon_after.as_secs(),
            sweep_interval_secs = config.sweep_interval.as_secs(),
            "Abandoned checkout sweeper started"
        );

        loop {
            interval.tick().await;
            match sweep(&pool, &payments, config.abandon_after).await {
                Ok(report) if report == SweepReport::default() => {}
                Ok(report) => tracing::info!(?report, "Abandoned checkout sweep finished"),
                Err(e) => tracing::warn!(error = %e, "Abandoned checkout sweep failed"),
            }
        }
    })
}

/// Run a single sweep over checkouts idle for longer than `abandon_after`.
///
/// # Errors
///
/// Returns `RepositoryError` if the abandoned checkouts cannot be listed.
#[instrument(skip(pool, payments))]
pub async fn sweep(
    pool: &PgPool,
    payments: &PaymentBackendClient,
    abandon_after: Duration,
) -> Result<SweepReport, RepositoryError> {
    let repo = PendingCheckoutRepository::new(pool);
    let mut report = SweepReport::default();

    for checkout in repo.list_abandoned(abandon_after, SWEEP_BATCH_SIZE).await? {
        let outcome = process(&checkout, payments).await;
        report.record(outcome);
        if !outcome.settled() {
            continue;
        }
        if let Err(e) = repo.mark_notified(checkout.id).await {
            tracing::warn!(error = %e, checkout_id = %checkout.id, "Failed to mark checkout notified");
        }
    }

    Ok(report)
}

/// Send the reminder for one snapshot, if it has anyone to address.
#[instrument(skip_all, fields(checkout_id = %checkout.id))]
pub async fn process(checkout: &PendingCheckout, payments: &PaymentBackendClient) -> Outcome {
    let Some(email) = reminder_for(checkout) else {
        return Outcome::Skipped;
    };

    match payments.send_abandoned_cart_email(&email).await {
        Ok(_) => Outcome::Sent,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to send abandoned cart email");
            Outcome::Failed
        }
    }
}

/// The reminder for a snapshot, if it has a cart and shipping details.
#[must_use]
pub fn reminder_for(checkout: &PendingCheckout) -> Option<OrderEmail> {
    let shipping = checkout.shipping.as_ref()?;
    if checkout.cart.is_empty() {
        return None;
    }
    let total = OrderSummary::for_cart(&checkout.cart).total;
    Some(OrderEmail::abandoned(
        &checkout.cart,
        total,
        shipping,
        Utc::now().timestamp_millis(),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use glowglaz_core::{Email, Money, ProductId};
    use uuid::Uuid;

    use super::*;
    use crate::cart::{Cart, CartLineItem};
    use crate::checkout::ShippingDetails;

    fn snapshot(cart: Cart, with_shipping: bool) -> PendingCheckout {
        let now = Utc::now();
        PendingCheckout {
            id: Uuid::new_v4(),
            email: with_shipping.then(|| "asha@example.in".to_owned()),
            cart,
            shipping: with_shipping.then(|| ShippingDetails {
                first_name: "Asha".to_owned(),
                last_name: "Rao".to_owned(),
                email: Email::parse("asha@example.in").unwrap(),
                phone: "9876543210".to_owned(),
                address: "12 MG Road".to_owned(),
                city: "Bengaluru".to_owned(),
                state: "Karnataka".to_owned(),
                pincode: "560001".to_owned(),
            }),
            created_at: now,
            updated_at: now,
            notified_at: None,
        }
    }

    fn cart_of(price: i64) -> Cart {
        let mut cart = Cart::new();
        cart.add(CartLineItem {
            id: ProductId::new(4),
            title: "PSORIGO Body Lotion".to_owned(),
            price: Money::rupees(price),
            image: String::new(),
            quantity: 1,
        });
        cart
    }

    #[test]
    fn reminder_total_includes_shipping() {
        let email = reminder_for(&snapshot(cart_of(1499), true)).unwrap();
        assert!(email.order_details.order_number.starts_with("PENDING-"));
        assert_eq!(email.order_details.total_amount, Money::rupees(1598).amount());
        assert_eq!(email.customer_email, "asha@example.in");
    }

    #[test]
    fn only_failures_stay_unsettled() {
        assert!(Outcome::Sent.settled());
        assert!(Outcome::Skipped.settled());
        assert!(!Outcome::Failed.settled());
    }

    #[test]
    fn report_counts_each_outcome() {
        let mut report = SweepReport::default();
        for outcome in [Outcome::Sent, Outcome::Failed, Outcome::Sent, Outcome::Skipped] {
            report.record(outcome);
        }
        assert_eq!(
            report,
            SweepReport {
                sent: 2,
                failed: 1,
                skipped: 1
            }
        );
    }

    #[test]
    fn no_reminder_without_shipping_or_items() {
        assert!(reminder_for(&snapshot(cart_of(1499), false)).is_none());
        assert!(reminder_for(&snapshot(Cart::new(), true)).is_none());
    }
}
