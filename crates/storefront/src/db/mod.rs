//! Database operations for storefront `PostgreSQL`.
//!
//! Products are a static table compiled into the binary; the database only
//! holds visitor state.
//!
//! ## Tables
//!
//! - `tower_sessions.session` - Tower-sessions storage (cart and checkout state)
//! - `storefront.pending_checkouts` - Checkout snapshots for abandoned cart reminders
//! - `storefront.pending_order_emails` - Confirmation emails awaiting retry
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p glowglaz-cli -- migrate
//! ```

pub mod pending_checkouts;
pub mod pending_emails;

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use pending_checkouts::{PendingCheckout, PendingCheckoutRepository};
pub use pending_emails::{PendingEmail, PendingEmailRepository};

/// Errors that can occur in repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// The instant `age` before `now`, saturating at the earliest representable time.
pub(crate) fn cutoff(now: DateTime<Utc>, age: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(age)
        .ok()
        .and_then(|delta| now.checked_sub_signed(delta))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Decode a JSONB column into `T`, reporting bad rows as corruption.
pub(crate) fn decode_json<T: serde::de::DeserializeOwned>(
    column: &str,
    value: serde_json::Value,
) -> Result<T, RepositoryError> {
    serde_json::from_value(value)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid {column} in database: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn cutoff_subtracts_age() {
        let now = Utc::now();
        assert_eq!(cutoff(now, Duration::from_secs(60)), now - TimeDelta::seconds(60));
    }

    #[test]
    fn cutoff_saturates() {
        let now = Utc::now();
        assert_eq!(cutoff(now, Duration::MAX), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn decode_json_reports_column() {
        let err = decode_json::<Vec<u32>>("cart", serde_json::json!({"not": "a list"})).unwrap_err();
        assert!(err.to_string().contains("invalid cart"));
    }
}
