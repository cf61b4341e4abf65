//! Seed commands.
//!
//! ```bash
//! gw-cli seed general-inquiry
//! gw-cli seed general-inquiry --id 6f1c...   # or API_GENERAL_INQUIRY_ID
//! ```

use granite_world_api::db::{PgStore, ensure_general_inquiry};
use granite_world_core::ProductId;

use super::{CliError, postgres_url};

/// Create the "General Inquiry" product under `id` if it is missing.
///
/// Safe to run repeatedly.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or the insert fails.
pub async fn general_inquiry(id: ProductId) -> Result<(), CliError> {
    let database_url = postgres_url("seed")?;
    let pool = granite_world_api::db::create_pool(&database_url).await?;
    let store = PgStore::new(pool);

    if ensure_general_inquiry(&store, id).await? {
        tracing::info!(%id, "General Inquiry product created");
    } else {
        tracing::info!(%id, "General Inquiry product already present");
    }
    Ok(())
}
