//! In-memory implementation of [`SeedStore`].
//!
//! Mirrors the `PostgreSQL` schema closely enough to exercise the seeder
//! without a database: unique keys are enforced, ids come from per-table
//! sequences, profiles are written together with their account and deleting
//! a category cascades to its products.
//!
//! The store is a cheap handle around shared tables. Clone it before handing
//! it to [`run_to_completion`](crate::run_to_completion) to inspect the
//! tables afterwards.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use marketplace_core::{
    CategoryId, CustomerId, Email, ProductId, SettingId, Slug, UserId, VendorId,
};

use super::{SeedStore, StoreError};
use crate::models::{
    CategoryRecord, CustomerRecord, NewCategory, NewProduct, NewProfile, NewSetting, NewUser,
    ProductRecord, SettingRecord, Upserted, UserRecord, VendorRecord,
};

/// Store operations that can be made to fail on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    UpsertUser,
    UpsertCategory,
    UpsertProduct,
    UpsertSetting,
    FindCategory,
    FindVendor,
}

/// A copy of every table, comparable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tables {
    pub users: Vec<UserRecord>,
    pub customers: Vec<CustomerRecord>,
    pub vendors: Vec<VendorRecord>,
    pub categories: Vec<CategoryRecord>,
    pub products: Vec<ProductRecord>,
    pub settings: Vec<SettingRecord>,
}

#[derive(Debug, Default)]
struct Sequences {
    user: i32,
    customer: i32,
    vendor: i32,
    category: i32,
    product: i32,
    setting: i32,
}

fn next(seq: &mut i32) -> i32 {
    *seq += 1;
    *seq
}

#[derive(Debug, Default)]
struct State {
    tables: Tables,
    sequences: Sequences,
    fail_on: Option<StoreOp>,
    calls: usize,
    closes: usize,
}

impl State {
    fn enter(&mut self, op: StoreOp) -> Result<(), StoreError> {
        self.calls += 1;
        if self.closes > 0 {
            return Err(StoreError::Unavailable("store already closed".to_owned()));
        }
        if self.fail_on == Some(op) {
            return Err(StoreError::Unavailable(format!("injected failure on {op:?}")));
        }
        Ok(())
    }
}

/// Seed store holding its tables in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call of `op` fail with `StoreError::Unavailable`.
    pub async fn fail_on(&self, op: StoreOp) {
        self.state.lock().await.fail_on = Some(op);
    }

    /// Copy of all tables.
    pub async fn snapshot(&self) -> Tables {
        self.state.lock().await.tables.clone()
    }

    /// Number of store calls issued so far, failed ones included.
    pub async fn call_count(&self) -> usize {
        self.state.lock().await.calls
    }

    /// Number of times [`SeedStore::close`] was called on any handle.
    pub async fn close_count(&self) -> usize {
        self.state.lock().await.closes
    }

    /// Account with this email, if any.
    pub async fn user(&self, email: &str) -> Option<UserRecord> {
        let state = self.state.lock().await;
        state
            .tables
            .users
            .iter()
            .find(|u| u.email.as_str() == email)
            .cloned()
    }

    /// Category with this slug, if any.
    pub async fn category(&self, slug: &str) -> Option<CategoryRecord> {
        let state = self.state.lock().await;
        state
            .tables
            .categories
            .iter()
            .find(|c| c.slug.as_str() == slug)
            .cloned()
    }

    /// Product with this slug, if any.
    pub async fn product(&self, slug: &str) -> Option<ProductRecord> {
        let state = self.state.lock().await;
        state
            .tables
            .products
            .iter()
            .find(|p| p.slug.as_str() == slug)
            .cloned()
    }

    /// Setting with this key, if any.
    pub async fn setting(&self, key: &str) -> Option<SettingRecord> {
        let state = self.state.lock().await;
        state
            .tables
            .settings
            .iter()
            .find(|s| s.key == key)
            .cloned()
    }

    /// Delete a category the way the schema does: its products go with it and
    /// its children become roots. Returns `false` if no such category exists.
    pub async fn remove_category(&self, slug: &str) -> bool {
        let mut state = self.state.lock().await;
        let tables = &mut state.tables;

        let Some(pos) = tables.categories.iter().position(|c| c.slug.as_str() == slug) else {
            return false;
        };
        let removed = tables.categories.remove(pos);

        tables.products.retain(|p| p.category_id != removed.id);
        for child in &mut tables.categories {
            if child.parent_id == Some(removed.id) {
                child.parent_id = None;
            }
        }
        true
    }
}

impl SeedStore for MemoryStore {
    async fn upsert_user(&self, user: NewUser) -> Result<Upserted<UserRecord>, StoreError> {
        let mut state = self.state.lock().await;
        state.enter(StoreOp::UpsertUser)?;

        if let Some(existing) = state.tables.users.iter().find(|u| u.email == user.email) {
            return Ok(Upserted::existing(existing.clone()));
        }

        if let NewProfile::Vendor(vendor) = &user.profile
            && state
                .tables
                .vendors
                .iter()
                .any(|v| v.store_slug == vendor.store_slug)
        {
            return Err(StoreError::Conflict(format!(
                "vendor store slug '{}' already exists",
                vendor.store_slug
            )));
        }

        let record = UserRecord {
            id: UserId::new(next(&mut state.sequences.user)),
            email: user.email,
            name: user.name,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };

        match user.profile {
            NewProfile::None => {}
            NewProfile::Customer => {
                let customer = CustomerRecord {
                    id: CustomerId::new(next(&mut state.sequences.customer)),
                    user_id: record.id,
                };
                state.tables.customers.push(customer);
            }
            NewProfile::Vendor(vendor) => {
                let vendor = VendorRecord {
                    id: VendorId::new(next(&mut state.sequences.vendor)),
                    user_id: record.id,
                    store_name: vendor.store_name,
                    store_slug: vendor.store_slug,
                    description: vendor.description,
                    is_approved: vendor.is_approved,
                    is_active: vendor.is_active,
                };
                state.tables.vendors.push(vendor);
            }
        }

        state.tables.users.push(record.clone());
        Ok(Upserted::created(record))
    }

    async fn upsert_category(
        &self,
        category: NewCategory,
    ) -> Result<Upserted<CategoryRecord>, StoreError> {
        let mut state = self.state.lock().await;
        state.enter(StoreOp::UpsertCategory)?;

        if let Some(existing) = state
            .tables
            .categories
            .iter()
            .find(|c| c.slug == category.slug)
        {
            return Ok(Upserted::existing(existing.clone()));
        }

        if let Some(parent_id) = category.parent_id
            && !state.tables.categories.iter().any(|c| c.id == parent_id)
        {
            return Err(StoreError::Conflict(format!(
                "parent category {parent_id} does not exist"
            )));
        }

        let record = CategoryRecord {
            id: CategoryId::new(next(&mut state.sequences.category)),
            name: category.name,
            slug: category.slug,
            description: category.description,
            parent_id: category.parent_id,
            sort_order: category.sort_order,
            created_at: Utc::now(),
        };
        state.tables.categories.push(record.clone());
        Ok(Upserted::created(record))
    }

    async fn upsert_product(
        &self,
        product: NewProduct,
    ) -> Result<Upserted<ProductRecord>, StoreError> {
        let mut state = self.state.lock().await;
        state.enter(StoreOp::UpsertProduct)?;

        if let Some(existing) = state
            .tables
            .products
            .iter()
            .find(|p| p.slug == product.slug)
        {
            return Ok(Upserted::existing(existing.clone()));
        }

        if !state
            .tables
            .categories
            .iter()
            .any(|c| c.id == product.category_id)
        {
            return Err(StoreError::Conflict(format!(
                "category {} does not exist",
                product.category_id
            )));
        }
        if !state.tables.vendors.iter().any(|v| v.id == product.vendor_id) {
            return Err(StoreError::Conflict(format!(
                "vendor {} does not exist",
                product.vendor_id
            )));
        }

        let record = ProductRecord {
            id: ProductId::new(next(&mut state.sequences.product)),
            title: product.title,
            slug: product.slug,
            description: product.description,
            short_description: product.short_description,
            price: product.price,
            compare_at_price: product.compare_at_price,
            inventory: product.inventory,
            is_featured: product.is_featured,
            tags: product.tags,
            images: product.images,
            vendor_id: product.vendor_id,
            category_id: product.category_id,
            created_at: Utc::now(),
        };
        state.tables.products.push(record.clone());
        Ok(Upserted::created(record))
    }

    async fn upsert_setting(
        &self,
        setting: NewSetting,
    ) -> Result<Upserted<SettingRecord>, StoreError> {
        let mut state = self.state.lock().await;
        state.enter(StoreOp::UpsertSetting)?;

        if let Some(existing) = state.tables.settings.iter().find(|s| s.key == setting.key) {
            return Ok(Upserted::existing(existing.clone()));
        }

        let record = SettingRecord {
            id: SettingId::new(next(&mut state.sequences.setting)),
            key: setting.key,
            value: setting.value,
            value_type: setting.value_type,
            created_at: Utc::now(),
        };
        state.tables.settings.push(record.clone());
        Ok(Upserted::created(record))
    }

    async fn find_category_by_slug(
        &self,
        slug: &Slug,
    ) -> Result<Option<CategoryRecord>, StoreError> {
        let mut state = self.state.lock().await;
        state.enter(StoreOp::FindCategory)?;

        Ok(state
            .tables
            .categories
            .iter()
            .find(|c| &c.slug == slug)
            .cloned())
    }

    async fn find_vendor_by_user_email(
        &self,
        email: &Email,
    ) -> Result<Option<VendorRecord>, StoreError> {
        let mut state = self.state.lock().await;
        state.enter(StoreOp::FindVendor)?;

        let Some(user) = state.tables.users.iter().find(|u| &u.email == email) else {
            return Ok(None);
        };
        Ok(state
            .tables
            .vendors
            .iter()
            .find(|v| v.user_id == user.id)
            .cloned())
    }

    async fn close(self) {
        self.state.lock().await.closes += 1;
    }
}
