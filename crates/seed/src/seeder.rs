//! The seeding pipeline.
//!
//! Stages run strictly in order over one store session:
//! accounts, categories, catalog, settings. The first error aborts the run;
//! skipped products do not.

use tracing::{info, instrument};

use crate::db::SeedStore;
use crate::error::SeedError;
use crate::password::CredentialHasher;
use crate::plan::SeedPlan;
use crate::report::SeedReport;
use crate::stages::{
    CatalogOutcome, build_category_tree, provision_accounts, provision_settings, seed_catalog,
};

/// Runs a [`SeedPlan`] against a borrowed store.
#[derive(Debug)]
pub struct Seeder<'a, S> {
    store: &'a S,
    hasher: CredentialHasher,
}

impl<'a, S: SeedStore> Seeder<'a, S> {
    /// Create a seeder over `store`.
    pub const fn new(store: &'a S, hasher: CredentialHasher) -> Self {
        Self { store, hasher }
    }

    /// Run every stage once.
    ///
    /// Running the same plan again against the same store creates nothing and
    /// modifies nothing.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any stage. Stages after the failing
    /// one are not started.
    #[instrument(skip_all)]
    pub async fn run(&self, plan: &SeedPlan) -> Result<SeedReport, SeedError> {
        info!("Seeding database");

        let accounts = provision_accounts(self.store, &self.hasher, &plan.accounts).await?;
        let categories = build_category_tree(self.store, &plan.categories).await?;

        let catalog = match &plan.catalog {
            Some(catalog) => seed_catalog(self.store, catalog, &accounts, &categories).await?,
            None => {
                info!("No catalog declared");
                CatalogOutcome::default()
            }
        };

        let settings = provision_settings(self.store, &plan.settings).await?;

        Ok(SeedReport {
            accounts,
            categories,
            catalog,
            settings,
        })
    }
}

/// Run the pipeline, then close the store.
///
/// The store is closed exactly once whether the pipeline succeeded or not,
/// and the pipeline's result is returned unchanged.
///
/// # Errors
///
/// Returns the pipeline error, if any.
pub async fn run_to_completion<S: SeedStore>(
    store: S,
    hasher: CredentialHasher,
    plan: &SeedPlan,
) -> Result<SeedReport, SeedError> {
    let result = Seeder::new(&store, hasher).run(plan).await;
    store.close().await;
    result
}
