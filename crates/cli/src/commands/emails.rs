//! Order confirmation email queue commands.
//!
//! Confirmations that fail to send at checkout are queued in
//! `storefront.pending_order_emails`. Nothing retries them automatically.
//!
//! # Usage
//!
//! ```bash
//! # Show queued emails
//! gg-cli emails list
//!
//! # Try sending up to 20 queued emails
//! gg-cli emails retry --limit 20
//! ```

use glowglaz_storefront::db::PendingEmailRepository;

use super::{CommandError, connect, payment_client};

/// Outcome of a retry run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RetrySummary {
    pub sent: usize,
    pub failed: usize,
}

/// Print unsent emails, oldest first.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or the query fails.
pub async fn list(limit: i64) -> Result<(), CommandError> {
    let pool = connect().await?;
    let queued = PendingEmailRepository::new(&pool).list_unsent(limit).await?;

    #[allow(clippy::print_stdout)]
    {
        if queued.is_empty() {
            println!("No queued emails.");
            return Ok(());
        }
        println!(
            "{:<36}  {:<12}  {:<30}  {:>8}  {:<20}  LAST ERROR",
            "ID", "ORDER", "CUSTOMER", "ATTEMPTS", "QUEUED AT"
        );
        for email in &queued {
            println!(
                "{:<36}  {:<12}  {:<30}  {:>8}  {:<20}  {}",
                email.id,
                email.payload.order_details.order_number,
                email.customer_email,
                email.attempts,
                email.created_at.format("%Y-%m-%d %H:%M:%S"),
                email.last_error.as_deref().unwrap_or("-"),
            );
        }
    }
    Ok(())
}

/// Resend queued emails, recording each attempt.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or the queue
/// cannot be read or updated. Individual send failures are recorded on the
/// email and counted, not returned.
pub async fn retry(limit: i64) -> Result<RetrySummary, CommandError> {
    let pool = connect().await?;
    let payments = payment_client()?;
    let repo = PendingEmailRepository::new(&pool);
    let mut summary = RetrySummary::default();

    for email in repo.list_unsent(limit).await? {
        match payments.send_order_confirmation(&email.payload).await {
            Ok(_) => {
                repo.mark_sent(email.id).await?;
                tracing::info!(id = %email.id, order = %email.payload.order_details.order_number, "Confirmation sent");
                summary.sent += 1;
            }
            Err(e) => {
                repo.record_failure(email.id, &e.to_string()).await?;
                tracing::warn!(id = %email.id, error = %e, "Confirmation still failing");
                summary.failed += 1;
            }
        }
    }

    tracing::info!(sent = summary.sent, failed = summary.failed, "Email retry complete");
    Ok(summary)
}
