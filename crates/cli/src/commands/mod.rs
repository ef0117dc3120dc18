//! CLI command implementations.

pub mod migrate;
pub mod seed;

/// Errors shared by CLI commands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Repository error: {0}")]
    Repository(#[from] raritone_storefront::db::RepositoryError),
}

/// Resolve the storefront database URL from the environment.
///
/// Prefers `STOREFRONT_DATABASE_URL` and falls back to `DATABASE_URL`,
/// the same order the storefront itself uses.
pub fn database_url() -> Result<String, CommandError> {
    dotenvy::dotenv().ok();
    std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CommandError::MissingEnvVar("STOREFRONT_DATABASE_URL"))
}
