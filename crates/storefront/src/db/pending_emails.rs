//! Queue of order confirmation emails that failed to send.
//!
//! Nothing retries these automatically; `gg-cli emails retry` drains the
//! queue by hand.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use super::{RepositoryError, decode_json};
use crate::payments::OrderEmail;

/// A queued confirmation email.
#[derive(Debug, Clone)]
pub struct PendingEmail {
    pub id: Uuid,
    pub customer_email: String,
    pub payload: OrderEmail,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
}

#[derive(sqlx::FromRow)]
struct PendingEmailRow {
    id: Uuid,
    customer_email: String,
    payload: serde_json::Value,
    attempts: i32,
    last_error: Option<String>,
    created_at: DateTime<Utc>,
    sent_at: Option<DateTime<Utc>>,
}

impl TryFrom<PendingEmailRow> for PendingEmail {
    type Error = RepositoryError;

    fn try_from(row: PendingEmailRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            customer_email: row.customer_email,
            payload: decode_json("payload", row.payload)?,
            attempts: row.attempts,
            last_error: row.last_error,
            created_at: row.created_at,
            sent_at: row.sent_at,
        })
    }
}

/// Repository for the pending email queue.
pub struct PendingEmailRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PendingEmailRepository<'a> {
    /// Create a new repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Queue an email after its first failed attempt.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn enqueue(&self, email: &OrderEmail, error: &str) -> Result<Uuid, RepositoryError> {
        let id = Uuid::new_v4();

        sqlx::query(
            r"
            INSERT INTO storefront.pending_order_emails (id, customer_email, payload, attempts, last_error)
            VALUES ($1, $2, $3, 1, $4)
            ",
        )
        .bind(id)
        .bind(&email.customer_email)
        .bind(Json(email))
        .bind(error)
        .execute(self.pool)
        .await?;

        Ok(id)
    }

    /// Unsent emails, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored payload is invalid.
    pub async fn list_unsent(&self, limit: i64) -> Result<Vec<PendingEmail>, RepositoryError> {
        let rows = sqlx::query_as::<_, PendingEmailRow>(
            r"
            SELECT id, customer_email, payload, attempts, last_error, created_at, sent_at
            FROM storefront.pending_order_emails
            WHERE sent_at IS NULL
            ORDER BY created_at
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(PendingEmail::try_from).collect()
    }

    /// Mark an email as delivered.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the email does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn mark_sent(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE storefront.pending_order_emails
            SET sent_at = NOW(), attempts = attempts + 1, last_error = NULL
            WHERE id = $1
            ",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Record another failed attempt.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the email does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn record_failure(&self, id: Uuid, error: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE storefront.pending_order_emails
            SET attempts = attempts + 1, last_error = $2
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(error)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
