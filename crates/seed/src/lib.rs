//! Marketplace seeder library.
//!
//! Brings a marketplace database to a known baseline: three role-scoped test
//! accounts, a two-level category tree, a small vendor catalog and the global
//! settings. Every write is keyed by a natural unique key and never modifies a
//! row that already exists, so the seeder can be re-run at any time.
//!
//! # Example
//!
//! ```rust,no_run
//! use marketplace_seed::{CredentialHasher, MemoryStore, SeedPlan, run_to_completion};
//!
//! # async fn example() -> Result<(), marketplace_seed::SeedError> {
//! let plan = SeedPlan::builtin()?;
//! let report = run_to_completion(MemoryStore::new(), CredentialHasher::new()?, &plan).await?;
//! marketplace_seed::report::log_summary(&report, &plan);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod db;
pub mod error;
pub mod models;
pub mod password;
pub mod plan;
pub mod report;
pub mod seeder;
pub mod stages;

pub use db::{MemoryStore, PgStore, SeedStore, StoreError};
pub use error::SeedError;
pub use password::CredentialHasher;
pub use plan::SeedPlan;
pub use report::SeedReport;
pub use seeder::{Seeder, run_to_completion};
