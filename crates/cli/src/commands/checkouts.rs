//! Abandoned checkout commands.
//!
//! # Usage
//!
//! ```bash
//! # Show every checkout snapshot
//! gg-cli checkouts list
//!
//! # Only snapshots idle for at least an hour
//! gg-cli checkouts list --older-than 60
//!
//! # Send reminders now instead of waiting for the storefront's sweeper
//! gg-cli checkouts sweep --after-minutes 30
//! ```

use std::time::Duration;

use glowglaz_storefront::checkout::OrderSummary;
use glowglaz_storefront::db::PendingCheckoutRepository;
use glowglaz_storefront::services::recovery::{self, SweepReport};

use super::{CommandError, connect, payment_client};

/// Print checkout snapshots, least recently active first.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or the query fails.
pub async fn list(older_than_minutes: Option<u64>) -> Result<(), CommandError> {
    let pool = connect().await?;
    let older_than = older_than_minutes.map(|m| Duration::from_secs(m.saturating_mul(60)));
    let checkouts = PendingCheckoutRepository::new(&pool).list(older_than).await?;

    #[allow(clippy::print_stdout)]
    {
        if checkouts.is_empty() {
            println!("No pending checkouts.");
            return Ok(());
        }
        println!(
            "{:<36}  {:<30}  {:>5}  {:>12}  {:<20}  NOTIFIED",
            "ID", "EMAIL", "ITEMS", "TOTAL", "LAST ACTIVE"
        );
        for checkout in &checkouts {
            println!(
                "{:<36}  {:<30}  {:>5}  {:>12}  {:<20}  {}",
                checkout.id,
                checkout.email.as_deref().unwrap_or("-"),
                checkout.cart.item_count(),
                OrderSummary::for_cart(&checkout.cart).total.to_string(),
                checkout.updated_at.format("%Y-%m-%d %H:%M:%S"),
                checkout
                    .notified_at
                    .map_or_else(|| "no".to_owned(), |at| at.format("%Y-%m-%d %H:%M").to_string()),
            );
        }
    }
    Ok(())
}

/// Run one abandoned checkout sweep.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or the snapshots
/// cannot be read.
pub async fn sweep(after_minutes: u64) -> Result<SweepReport, CommandError> {
    let pool = connect().await?;
    let payments = payment_client()?;
    let abandon_after = Duration::from_secs(after_minutes.saturating_mul(60));

    let report = recovery::sweep(&pool, &payments, abandon_after).await?;
    tracing::info!(?report, "Sweep complete");
    Ok(report)
}
