//! `PostgreSQL` implementation of [`SeedStore`].
//!
//! Every insert-or-update is an `INSERT ... ON CONFLICT (key) DO NOTHING
//! RETURNING ...`. When the insert is swallowed by the conflict clause the
//! existing row is read back in the same transaction, so callers always get
//! the persisted record and know whether they created it.

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use tracing::{debug, instrument};

use marketplace_core::{Email, Slug};

use super::{SeedStore, StoreError};
use crate::models::{
    CategoryRecord, NewCategory, NewProduct, NewProfile, NewSetting, NewUser, ProductRecord,
    SettingRecord, Upserted, UserRecord, VendorRecord,
};

/// Embedded schema migrations (`crates/seed/migrations/`).
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Create the connection pool for a seeding run.
///
/// The pool holds a single connection: the seeder issues one statement at a
/// time, and one connection keeps the whole run on one session.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

const USER_COLUMNS: &str = "id, email, name, password_hash, role, created_at";
const CATEGORY_COLUMNS: &str = "id, name, slug, description, parent_id, sort_order, created_at";
const PRODUCT_COLUMNS: &str = "id, title, slug, description, short_description, price, \
     compare_at_price, inventory, is_featured, tags, images, vendor_id, category_id, created_at";
const SETTING_COLUMNS: &str = "id, key, value, type, created_at";

/// Seed store backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect using [`create_pool`].
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the connection cannot be established.
    pub async fn connect(database_url: &secrecy::SecretString) -> Result<Self, StoreError> {
        Ok(Self::new(create_pool(database_url).await?))
    }

    /// Apply pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Migration` if a migration fails to apply.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        MIGRATOR.run(&self.pool).await?;
        Ok(())
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl SeedStore for PgStore {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn upsert_user(&self, user: NewUser) -> Result<Upserted<UserRecord>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let inserted: Option<UserRecord> = sqlx::query_as(&format!(
            r"
            INSERT INTO marketplace.user (email, name, password_hash, role)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO NOTHING
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.role)
        .fetch_optional(&mut *tx)
        .await?;

        let result = if let Some(record) = inserted {
            match &user.profile {
                NewProfile::None => {}
                NewProfile::Customer => {
                    sqlx::query("INSERT INTO marketplace.customer (user_id) VALUES ($1)")
                        .bind(record.id)
                        .execute(&mut *tx)
                        .await
                        .map_err(map_unique_violation)?;
                }
                NewProfile::Vendor(vendor) => {
                    sqlx::query(
                        r"
                        INSERT INTO marketplace.vendor
                            (user_id, store_name, store_slug, description, is_approved, is_active)
                        VALUES ($1, $2, $3, $4, $5, $6)
                        ",
                    )
                    .bind(record.id)
                    .bind(&vendor.store_name)
                    .bind(&vendor.store_slug)
                    .bind(&vendor.description)
                    .bind(vendor.is_approved)
                    .bind(vendor.is_active)
                    .execute(&mut *tx)
                    .await
                    .map_err(map_unique_violation)?;
                }
            }
            debug!(id = %record.id, "Inserted user");
            Upserted::created(record)
        } else {
            let record: UserRecord = sqlx::query_as(&format!(
                "SELECT {USER_COLUMNS} FROM marketplace.user WHERE email = $1"
            ))
            .bind(&user.email)
            .fetch_one(&mut *tx)
            .await?;
            Upserted::existing(record)
        };

        tx.commit().await?;
        Ok(result)
    }

    #[instrument(skip(self, category), fields(slug = %category.slug))]
    async fn upsert_category(
        &self,
        category: NewCategory,
    ) -> Result<Upserted<CategoryRecord>, StoreError> {
        let inserted: Option<CategoryRecord> = sqlx::query_as(&format!(
            r"
            INSERT INTO marketplace.category (name, slug, description, parent_id, sort_order)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (slug) DO NOTHING
            RETURNING {CATEGORY_COLUMNS}
            "
        ))
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .bind(category.parent_id)
        .bind(category.sort_order)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(record) = inserted {
            return Ok(Upserted::created(record));
        }

        self.find_category_by_slug(&category.slug)
            .await?
            .map(Upserted::existing)
            .ok_or_else(|| vanished("category", category.slug.as_str()))
    }

    #[instrument(skip(self, product), fields(slug = %product.slug))]
    async fn upsert_product(
        &self,
        product: NewProduct,
    ) -> Result<Upserted<ProductRecord>, StoreError> {
        let inserted: Option<ProductRecord> = sqlx::query_as(&format!(
            r"
            INSERT INTO marketplace.product
                (title, slug, description, short_description, price, compare_at_price,
                 inventory, is_featured, tags, images, vendor_id, category_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (slug) DO NOTHING
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&product.title)
        .bind(&product.slug)
        .bind(&product.description)
        .bind(&product.short_description)
        .bind(product.price)
        .bind(product.compare_at_price)
        .bind(product.inventory)
        .bind(product.is_featured)
        .bind(&product.tags)
        .bind(&product.images)
        .bind(product.vendor_id)
        .bind(product.category_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(record) = inserted {
            return Ok(Upserted::created(record));
        }

        let existing: Option<ProductRecord> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM marketplace.product WHERE slug = $1"
        ))
        .bind(&product.slug)
        .fetch_optional(&self.pool)
        .await?;

        existing
            .map(Upserted::existing)
            .ok_or_else(|| vanished("product", product.slug.as_str()))
    }

    #[instrument(skip(self, setting), fields(key = %setting.key))]
    async fn upsert_setting(
        &self,
        setting: NewSetting,
    ) -> Result<Upserted<SettingRecord>, StoreError> {
        let inserted: Option<SettingRecord> = sqlx::query_as(&format!(
            r"
            INSERT INTO marketplace.setting (key, value, type)
            VALUES ($1, $2, $3)
            ON CONFLICT (key) DO NOTHING
            RETURNING {SETTING_COLUMNS}
            "
        ))
        .bind(&setting.key)
        .bind(&setting.value)
        .bind(setting.value_type)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(record) = inserted {
            return Ok(Upserted::created(record));
        }

        let existing: Option<SettingRecord> = sqlx::query_as(&format!(
            "SELECT {SETTING_COLUMNS} FROM marketplace.setting WHERE key = $1"
        ))
        .bind(&setting.key)
        .fetch_optional(&self.pool)
        .await?;

        existing
            .map(Upserted::existing)
            .ok_or_else(|| vanished("setting", &setting.key))
    }

    async fn find_category_by_slug(
        &self,
        slug: &Slug,
    ) -> Result<Option<CategoryRecord>, StoreError> {
        let record = sqlx::query_as(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM marketplace.category WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_vendor_by_user_email(
        &self,
        email: &Email,
    ) -> Result<Option<VendorRecord>, StoreError> {
        let record = sqlx::query_as(
            r"
            SELECT v.id, v.user_id, v.store_name, v.store_slug, v.description,
                   v.is_approved, v.is_active
            FROM marketplace.vendor v
            JOIN marketplace.user u ON u.id = v.user_id
            WHERE u.email = $1
            ORDER BY v.id
            LIMIT 1
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn close(self) {
        self.pool.close().await;
        debug!("Database pool closed");
    }
}

/// Turn unique violations into `StoreError::Conflict`.
fn map_unique_violation(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return StoreError::Conflict(db_err.message().to_owned());
    }
    StoreError::Database(e)
}

/// A row hit the conflict clause but was gone by the time it was read back.
fn vanished(entity: &str, key: &str) -> StoreError {
    StoreError::DataCorruption(format!("{entity} '{key}' conflicted on insert but was not found"))
}
