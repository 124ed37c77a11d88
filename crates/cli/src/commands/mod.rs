//! CLI command implementations.

pub mod checkouts;
pub mod emails;
pub mod migrate;

use glowglaz_storefront::config::{DEFAULT_PAYMENT_API_URL, PaymentConfig};
use glowglaz_storefront::db::RepositoryError;
use glowglaz_storefront::payments::{PaymentBackendClient, PaymentError};
use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;
use url::Url;

/// Errors shared by the CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Environment variable present but unusable.
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(&'static str, String),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failure.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Repository query failure.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Payment backend failure.
    #[error("Payment backend error: {0}")]
    Payment(#[from] PaymentError),
}

/// Storefront database URL from `STOREFRONT_DATABASE_URL` or `DATABASE_URL`.
fn database_url() -> Result<SecretString, CommandError> {
    std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("STOREFRONT_DATABASE_URL"))
}

/// Connect to the storefront database.
async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();
    let url = database_url()?;
    tracing::info!("Connecting to storefront database...");
    Ok(glowglaz_storefront::db::create_pool(&url).await?)
}

/// Payment backend client from `PAYMENT_API_URL` (or the default backend).
fn payment_client() -> Result<PaymentBackendClient, CommandError> {
    let raw = std::env::var("PAYMENT_API_URL").unwrap_or_else(|_| DEFAULT_PAYMENT_API_URL.to_owned());
    let url = Url::parse(&raw)
        .map_err(|e| CommandError::InvalidEnvVar("PAYMENT_API_URL", e.to_string()))?;
    Ok(PaymentBackendClient::new(&PaymentConfig::new(url))?)
}
