//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! mp-cli migrate
//! ```
//!
//! Applies the migrations embedded from `crates/seed/migrations/`, creating
//! the `marketplace` schema, its enum types and tables.

use tracing::info;

use marketplace_seed::{PgStore, SeedStore};

use crate::config::DatabaseConfig;
use crate::error::CliError;

/// Apply pending migrations to the configured database.
///
/// # Errors
///
/// Returns an error if configuration is missing, the connection fails or a
/// migration fails to apply.
pub async fn run() -> Result<(), CliError> {
    let config = DatabaseConfig::from_env()?;

    info!("Connecting to marketplace database...");
    let store = PgStore::connect(&config.database_url).await?;

    info!("Running marketplace migrations...");
    let result = store.migrate().await;
    store.close().await;
    result?;

    info!("Marketplace migrations complete!");
    Ok(())
}
