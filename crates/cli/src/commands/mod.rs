//! Subcommand implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use thiserror::Error;

use granite_world_api::db::RepositoryError;

/// Errors surfaced by `gw-cli` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// The command needs `PostgreSQL` but a `memory://` URL was given.
    #[error("{0} requires a PostgreSQL API_DATABASE_URL, not memory://")]
    MemoryStore(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] RepositoryError),

    /// Invalid user input.
    #[error("{0}")]
    Input(String),
}

/// `API_DATABASE_URL`, rejecting the in-memory store for `command`.
pub(crate) fn postgres_url(command: &'static str) -> Result<SecretString, CliError> {
    dotenvy::dotenv().ok();

    let url = std::env::var("API_DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| CliError::MissingEnvVar("API_DATABASE_URL"))?;

    if granite_world_api::db::is_memory_url(&url) {
        return Err(CliError::MemoryStore(command));
    }
    Ok(url)
}
