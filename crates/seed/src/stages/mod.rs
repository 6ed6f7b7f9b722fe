//! Seeding stages.
//!
//! Each stage is a plain async function over a [`SeedStore`](crate::db::SeedStore)
//! reference. Stages that later stages depend on return typed outputs:
//!
//! - [`accounts`] -> [`ProvisionedAccounts`]
//! - [`categories`] -> [`CategoryIndex`]
//! - [`catalog`] consumes both -> [`CatalogOutcome`]
//! - [`settings`] -> [`SettingsOutcome`]

pub mod accounts;
pub mod catalog;
pub mod categories;
pub mod settings;

pub use accounts::{ProvisionedAccount, ProvisionedAccounts, provision_accounts};
pub use catalog::{CatalogOutcome, SeededProduct, SkipReason, SkippedProduct, seed_catalog};
pub use categories::{CategoryIndex, build_category_tree};
pub use settings::{SettingsOutcome, provision_settings};
