//! Database operations for the storefront `PostgreSQL` instance.
//!
//! # Schema: `storefront`
//!
//! The document store behind the storefront. Tables:
//!
//! - `account` - One row per identity-provider account (profile, recent
//!   searches, scan snapshot)
//! - `cart_item` - Per-account cart lines, keyed (account, product, size)
//! - `product` - The catalog (seeded via the CLI; the single product source)
//! - `scan` - Append-only body-scan records
//! - `chat_message` - Per-account append-only chat log
//! - `guest_message` - Chat submissions from unauthenticated visitors
//!
//! The tower-sessions table lives in its own schema and is created by the
//! session store's migrator at startup.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p raritone-cli -- migrate
//! ```
//!
//! Queries use the runtime-checked sqlx API (not the `query!` macros), so
//! building the workspace does not require a live database.

pub mod chat;
pub mod products;
pub mod scans;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use chat::ChatRepository;
pub use products::ProductRepository;
pub use scans::ScanRepository;
pub use users::UserRepository;

/// Errors returned by repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored value failed to parse back into its domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The targeted row does not exist.
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
