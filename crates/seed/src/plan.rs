//! Fixture data: what a seeding run should converge to.
//!
//! The dataset is a YAML document. The built-in marketplace fixture is
//! embedded at compile time from `crates/seed/fixtures/marketplace.yaml`.
//!
//! ## YAML Format
//!
//! ```yaml
//! accounts:
//!   - email: vendor@example.com
//!     name: Jane Vendor
//!     password: vendor123
//!     role: VENDOR
//!     vendor:
//!       store_name: Jane's Electronics Store
//!       store_slug: janes-electronics-store
//!
//! categories:
//!   - name: Electronics
//!     slug: electronics
//!     children:
//!       - { name: Smartphones, slug: smartphones }
//!
//! catalog:
//!   vendor: vendor@example.com
//!   products:
//!     - title: iPhone 15 Pro
//!       slug: iphone-15-pro
//!       category: smartphones
//!       description: The latest iPhone
//!       price: "999.99"
//!
//! settings:
//!   - { key: currency, value: USD, type: string }
//! ```
//!
//! Emails and slugs are validated while parsing. [`validate_plan`] then
//! checks the cross-entry rules: unique keys and role/profile consistency.

use std::collections::HashSet;

use serde::Deserialize;

use marketplace_core::{Email, Price, SettingType, Slug, UserRole};

use crate::error::SeedError;

/// The embedded marketplace fixture.
pub const BUILTIN_FIXTURE: &str = include_str!("../fixtures/marketplace.yaml");

/// Everything a seeding run should create.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedPlan {
    #[serde(default)]
    pub accounts: Vec<AccountFixture>,
    #[serde(default)]
    pub categories: Vec<CategoryFixture>,
    pub catalog: Option<CatalogFixture>,
    #[serde(default)]
    pub settings: Vec<SettingFixture>,
}

/// An account with a plaintext fixture password.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountFixture {
    pub email: Email,
    pub name: String,
    /// Plaintext test credential. Hashed before it reaches the store.
    pub password: String,
    pub role: UserRole,
    /// Store profile; required for `VENDOR` and rejected for other roles.
    pub vendor: Option<VendorFixture>,
}

/// A vendor's store profile.
#[derive(Debug, Clone, Deserialize)]
pub struct VendorFixture {
    pub store_name: String,
    pub store_slug: Slug,
    pub description: Option<String>,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

const fn default_true() -> bool {
    true
}

/// A category and, for roots, its ordered children.
///
/// Declaration order within a sibling list becomes the sort order.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryFixture {
    pub name: String,
    pub slug: Slug,
    pub description: Option<String>,
    #[serde(default)]
    pub children: Vec<CategoryFixture>,
}

/// Products sold by one vendor.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFixture {
    /// Email of the vendor account that owns every product.
    pub vendor: Email,
    #[serde(default)]
    pub products: Vec<ProductFixture>,
}

/// A product, bound to its category by slug.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductFixture {
    pub title: String,
    pub slug: Slug,
    pub category: Slug,
    pub description: String,
    pub short_description: Option<String>,
    pub price: Price,
    pub compare_at_price: Option<Price>,
    #[serde(default)]
    pub inventory: i32,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// A global configuration entry.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingFixture {
    pub key: String,
    pub value: String,
    #[serde(rename = "type", default)]
    pub value_type: SettingType,
}

impl SeedPlan {
    /// Parse and validate a fixture document.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Parse` if the YAML is malformed or contains an
    /// invalid email or slug, and `SeedError::InvalidPlan` if validation fails.
    pub fn from_yaml(yaml: &str) -> Result<Self, SeedError> {
        let plan: Self = serde_yaml::from_str(yaml)?;

        let errors = validate_plan(&plan);
        if !errors.is_empty() {
            return Err(SeedError::InvalidPlan(errors));
        }

        Ok(plan)
    }

    /// The embedded marketplace fixture.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded document does not parse or validate.
    pub fn builtin() -> Result<Self, SeedError> {
        Self::from_yaml(BUILTIN_FIXTURE)
    }

    /// Every category, parents first, each followed by its children.
    pub fn categories_flat(&self) -> impl Iterator<Item = &CategoryFixture> {
        self.categories
            .iter()
            .flat_map(|parent| std::iter::once(parent).chain(parent.children.iter()))
    }

    /// Plaintext credential for an account email, if it is a fixture account.
    #[must_use]
    pub fn password_for(&self, email: &Email) -> Option<&str> {
        self.accounts
            .iter()
            .find(|a| &a.email == email)
            .map(|a| a.password.as_str())
    }
}

/// Validate a seed plan.
///
/// Checks that unique keys are unique, that the taxonomy is two levels deep
/// and that only vendor accounts carry a store profile. A product whose
/// category is not declared here is not an error: it may already exist in the
/// store, and if it does not, the catalog stage skips the product.
#[must_use]
pub fn validate_plan(plan: &SeedPlan) -> Vec<String> {
    let mut errors = Vec::new();

    let mut emails = HashSet::new();
    let mut store_slugs = HashSet::new();
    for account in &plan.accounts {
        if !emails.insert(&account.email) {
            errors.push(format!("Duplicate account email: {}", account.email));
        }

        match (account.role, &account.vendor) {
            (UserRole::Vendor, None) => {
                errors.push(format!(
                    "Vendor account {} has no vendor profile",
                    account.email
                ));
            }
            (UserRole::Admin | UserRole::Customer, Some(_)) => {
                errors.push(format!(
                    "{} account {} cannot have a vendor profile",
                    account.role, account.email
                ));
            }
            (_, Some(vendor)) => {
                if !store_slugs.insert(&vendor.store_slug) {
                    errors.push(format!(
                        "Duplicate vendor store slug: {}",
                        vendor.store_slug
                    ));
                }
            }
            (_, None) => {}
        }

        if account.password.is_empty() {
            errors.push(format!("Empty password for account {}", account.email));
        }
    }

    let mut category_slugs = HashSet::new();
    for category in plan.categories_flat() {
        if !category_slugs.insert(&category.slug) {
            errors.push(format!("Duplicate category slug: {}", category.slug));
        }
    }
    for parent in &plan.categories {
        for child in &parent.children {
            if !child.children.is_empty() {
                errors.push(format!(
                    "Category {} under {} is nested more than two levels deep",
                    child.slug, parent.slug
                ));
            }
        }
    }

    if let Some(catalog) = &plan.catalog {
        let mut product_slugs = HashSet::new();
        for product in &catalog.products {
            if !product_slugs.insert(&product.slug) {
                errors.push(format!("Duplicate product slug: {}", product.slug));
            }
            if product.inventory < 0 {
                errors.push(format!("Negative inventory for product {}", product.slug));
            }
        }
    }

    let mut setting_keys = HashSet::new();
    for setting in &plan.settings {
        if setting.key.trim().is_empty() {
            errors.push("Empty setting key".to_owned());
        } else if !setting_keys.insert(setting.key.as_str()) {
            errors.push(format!("Duplicate setting key: {}", setting.key));
        }
    }

    errors
}
