//! GlowGlaz CLI - database migrations and operational tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! gg-cli migrate
//!
//! # Inspect and retry order confirmation emails that failed to send
//! gg-cli emails list
//! gg-cli emails retry --limit 20
//!
//! # Inspect abandoned checkouts and send reminders
//! gg-cli checkouts list --older-than 30
//! gg-cli checkouts sweep
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

/// Default batch size for email commands.
const DEFAULT_EMAIL_LIMIT: i64 = 50;

#[derive(Parser)]
#[command(name = "gg-cli")]
#[command(author, version, about = "GlowGlaz CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Manage queued order confirmation emails
    Emails {
        #[command(subcommand)]
        action: EmailAction,
    },
    /// Manage abandoned checkout snapshots
    Checkouts {
        #[command(subcommand)]
        action: CheckoutAction,
    },
}

#[derive(Subcommand)]
enum EmailAction {
    /// List unsent emails
    List {
        /// Maximum number of emails to show
        #[arg(short, long, default_value_t = DEFAULT_EMAIL_LIMIT)]
        limit: i64,
    },
    /// Try sending unsent emails again
    Retry {
        /// Maximum number of emails to attempt
        #[arg(short, long, default_value_t = DEFAULT_EMAIL_LIMIT)]
        limit: i64,
    },
}

#[derive(Subcommand)]
enum CheckoutAction {
    /// List checkout snapshots
    List {
        /// Only show checkouts idle for at least this many minutes
        #[arg(long = "older-than", value_name = "MINUTES")]
        older_than_minutes: Option<u64>,
    },
    /// Send reminders for abandoned checkouts now
    Sweep {
        /// Minutes of inactivity before a checkout counts as abandoned
        #[arg(long, default_value_t = 30)]
        after_minutes: u64,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Emails { action } => match action {
            EmailAction::List { limit } => commands::emails::list(limit).await?,
            EmailAction::Retry { limit } => {
                let summary = commands::emails::retry(limit).await?;
                if summary.failed > 0 {
                    tracing::warn!(failed = summary.failed, "Some emails are still queued");
                }
            }
        },
        Commands::Checkouts { action } => match action {
            CheckoutAction::List { older_than_minutes } => {
                commands::checkouts::list(older_than_minutes).await?;
            }
            CheckoutAction::Sweep { after_minutes } => {
                commands::checkouts::sweep(after_minutes).await?;
            }
        },
    }
    Ok(())
}
