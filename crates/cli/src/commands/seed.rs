//! Seed the marketplace database with the built-in fixture.
//!
//! Safe to run repeatedly: rows that already exist are left untouched.

use tracing::{error, info};

use marketplace_seed::report::log_summary;
use marketplace_seed::{CredentialHasher, PgStore, SeedPlan, run_to_completion};

use crate::config::DatabaseConfig;
use crate::error::CliError;

/// Run the seeding pipeline against the configured database.
///
/// The fixture is parsed and validated before connecting. Once connected,
/// the pool is closed exactly once, whatever the outcome.
///
/// # Errors
///
/// Returns an error if configuration is missing, the fixture is invalid, the
/// connection fails or any seeding stage fails.
pub async fn run() -> Result<(), CliError> {
    let config = DatabaseConfig::from_env()?;

    let plan = match SeedPlan::builtin() {
        Ok(plan) => plan,
        Err(e) => {
            error!("Fixture validation failed");
            return Err(e.into());
        }
    };
    info!(
        accounts = plan.accounts.len(),
        categories = plan.categories_flat().count(),
        settings = plan.settings.len(),
        "Fixture loaded"
    );

    let hasher = CredentialHasher::new()?;
    let store = PgStore::connect(&config.database_url).await?;
    info!("Connected to database");

    let report = run_to_completion(store, hasher, &plan).await?;
    log_summary(&report, &plan);

    Ok(())
}
