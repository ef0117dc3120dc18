//! Database migration command.
//!
//! Migrations live in `crates/storefront/migrations/` and are embedded
//! at compile time, so the CLI binary can migrate any environment it
//! can reach.

use sqlx::PgPool;

use super::CommandError;

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let database_url = super::database_url()?;

    tracing::info!("Connecting to storefront database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Storefront migrations complete");
    Ok(())
}
