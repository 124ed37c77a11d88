//! Pending checkout repository.
//!
//! A snapshot is written whenever a visitor's checkout changes while their
//! cart has items, and removed when the order completes. Snapshots that go
//! idle with an email address are picked up by the recovery sweeper.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use super::{RepositoryError, cutoff, decode_json};
use crate::cart::Cart;
use crate::checkout::ShippingDetails;

/// A stored checkout snapshot.
#[derive(Debug, Clone)]
pub struct PendingCheckout {
    pub id: Uuid,
    pub email: Option<String>,
    pub cart: Cart,
    pub shipping: Option<ShippingDetails>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub notified_at: Option<DateTime<Utc>>,
}

#[derive(sqlx::FromRow)]
struct PendingCheckoutRow {
    id: Uuid,
    email: Option<String>,
    cart: serde_json::Value,
    shipping: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    notified_at: Option<DateTime<Utc>>,
}

impl TryFrom<PendingCheckoutRow> for PendingCheckout {
    type Error = RepositoryError;

    fn try_from(row: PendingCheckoutRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            email: row.email,
            cart: decode_json("cart", row.cart)?,
            shipping: row
                .shipping
                .map(|value| decode_json("shipping", value))
                .transpose()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
            notified_at: row.notified_at,
        })
    }
}

const COLUMNS: &str = "id, email, cart, shipping, created_at, updated_at, notified_at";

/// Repository for pending checkout snapshots.
pub struct PendingCheckoutRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PendingCheckoutRepository<'a> {
    /// Create a new repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert or refresh the snapshot for checkout `id`.
    ///
    /// Refreshing bumps `updated_at`, which restarts the abandonment clock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert(
        &self,
        id: Uuid,
        cart: &Cart,
        shipping: Option<&ShippingDetails>,
    ) -> Result<(), RepositoryError> {
        let email = shipping.map(|s| s.email.as_str());

        sqlx::query(
            r"
            INSERT INTO storefront.pending_checkouts (id, email, cart, shipping)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET email = EXCLUDED.email,
                cart = EXCLUDED.cart,
                shipping = EXCLUDED.shipping,
                updated_at = NOW()
            ",
        )
        .bind(id)
        .bind(email)
        .bind(Json(cart))
        .bind(shipping.map(Json))
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Remove the snapshot for a completed (or emptied) checkout.
    ///
    /// Returns whether a snapshot existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM storefront.pending_checkouts WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Snapshots with an email, not yet notified, idle for longer than `idle`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored JSON is invalid.
    pub async fn list_abandoned(
        &self,
        idle: Duration,
        limit: i64,
    ) -> Result<Vec<PendingCheckout>, RepositoryError> {
        let rows = sqlx::query_as::<_, PendingCheckoutRow>(&format!(
            r"
            SELECT {COLUMNS}
            FROM storefront.pending_checkouts
            WHERE email IS NOT NULL
              AND notified_at IS NULL
              AND updated_at < $1
            ORDER BY updated_at
            LIMIT $2
            "
        ))
        .bind(cutoff(Utc::now(), idle))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(PendingCheckout::try_from).collect()
    }

    /// All snapshots, oldest activity first, optionally only those idle
    /// longer than `older_than`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored JSON is invalid.
    pub async fn list(
        &self,
        older_than: Option<Duration>,
    ) -> Result<Vec<PendingCheckout>, RepositoryError> {
        let before = older_than.map_or_else(Utc::now, |age| cutoff(Utc::now(), age));

        let rows = sqlx::query_as::<_, PendingCheckoutRow>(&format!(
            r"
            SELECT {COLUMNS}
            FROM storefront.pending_checkouts
            WHERE updated_at <= $1
            ORDER BY updated_at
            "
        ))
        .bind(before)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(PendingCheckout::try_from).collect()
    }

    /// Record that the abandoned cart reminder went out.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the snapshot no longer exists.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn mark_notified(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE storefront.pending_checkouts SET notified_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
