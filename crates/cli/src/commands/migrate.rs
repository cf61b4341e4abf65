//! Database migration command.
//!
//! ```bash
//! gw-cli migrate
//! ```
//!
//! Applies `crates/api/migrations/` to the database named by
//! `API_DATABASE_URL`. Already-applied migrations are skipped.

use super::{CliError, postgres_url};

/// Run pending API migrations.
///
/// # Errors
///
/// Returns `CliError` if the URL is missing, the database is unreachable,
/// or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let database_url = postgres_url("migrate")?;

    tracing::info!("Connecting to database...");
    let pool = granite_world_api::db::create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    granite_world_api::db::MIGRATOR.run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
