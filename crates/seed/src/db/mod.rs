//! Store seam used by the seeding stages.
//!
//! The seeder never talks to a database directly. Every stage goes through
//! [`SeedStore`], whose insert-or-update calls all share one contract: the
//! update branch is empty, so a row that already exists under the unique key
//! is returned untouched.
//!
//! # Implementations
//!
//! - [`PgStore`] - `PostgreSQL` via sqlx (`marketplace` schema)
//! - [`MemoryStore`] - in-process tables for tests and local experiments
//!
//! # Migrations
//!
//! The schema lives in `crates/seed/migrations/` and is applied with:
//! ```bash
//! cargo run -p marketplace-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use std::future::Future;

use thiserror::Error;

use marketplace_core::{Email, Slug};

use crate::models::{
    CategoryRecord, NewCategory, NewProduct, NewSetting, NewUser, ProductRecord, SettingRecord,
    Upserted, UserRecord, VendorRecord,
};

pub use memory::MemoryStore;
pub use postgres::{MIGRATOR, PgStore, create_pool};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., a vendor store slug already taken).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The store cannot serve requests.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// The persistence operations the seeder needs.
///
/// Calls are issued one at a time and each is awaited before the next, so
/// implementations do not need to guard against concurrent writers from the
/// seeder itself.
pub trait SeedStore {
    /// Insert an account keyed by email, together with its owned profile.
    ///
    /// The profile is only created when the account is. An existing account
    /// is returned as-is, including its credential digest.
    fn upsert_user(
        &self,
        user: NewUser,
    ) -> impl Future<Output = Result<Upserted<UserRecord>, StoreError>> + Send;

    /// Insert a category keyed by slug.
    fn upsert_category(
        &self,
        category: NewCategory,
    ) -> impl Future<Output = Result<Upserted<CategoryRecord>, StoreError>> + Send;

    /// Insert a product keyed by slug.
    fn upsert_product(
        &self,
        product: NewProduct,
    ) -> impl Future<Output = Result<Upserted<ProductRecord>, StoreError>> + Send;

    /// Insert a global setting keyed by its key.
    fn upsert_setting(
        &self,
        setting: NewSetting,
    ) -> impl Future<Output = Result<Upserted<SettingRecord>, StoreError>> + Send;

    /// Look up a category by its unique slug.
    fn find_category_by_slug(
        &self,
        slug: &Slug,
    ) -> impl Future<Output = Result<Option<CategoryRecord>, StoreError>> + Send;

    /// Find the first vendor profile whose owning account has this email.
    fn find_vendor_by_user_email(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<Option<VendorRecord>, StoreError>> + Send;

    /// Release the underlying session. Called exactly once, at the end of a run.
    fn close(self) -> impl Future<Output = ()> + Send;
}
