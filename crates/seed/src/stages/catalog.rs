//! Catalog seeding: products bound to one vendor and to a category by slug.
//!
//! Catalog data is best-effort. A product whose category cannot be found in
//! the store is skipped rather than written with a dangling reference, and the
//! rest of the catalog carries on. Store failures still abort the run.

use tracing::{info, instrument, warn};

use marketplace_core::{Email, ProductId, Slug, VendorId};

use crate::db::SeedStore;
use crate::error::SeedError;
use crate::models::NewProduct;
use crate::plan::{CatalogFixture, ProductFixture};

use super::accounts::ProvisionedAccounts;
use super::categories::CategoryIndex;

/// Why a product was left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The category slug does not resolve in the store.
    CategoryMissing,
    /// No vendor profile belongs to the catalog's vendor email.
    VendorMissing,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CategoryMissing => write!(f, "category not found"),
            Self::VendorMissing => write!(f, "vendor not found"),
        }
    }
}

/// A product the catalog stage did not write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedProduct {
    pub slug: Slug,
    pub category: Slug,
    pub reason: SkipReason,
}

/// A product as it stands after seeding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededProduct {
    pub id: ProductId,
    pub slug: Slug,
    pub created: bool,
}

/// Output of the catalog stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogOutcome {
    pub vendor_id: Option<VendorId>,
    pub products: Vec<SeededProduct>,
    pub skipped: Vec<SkippedProduct>,
}

impl CatalogOutcome {
    /// Number of products created by this run.
    #[must_use]
    pub fn created(&self) -> usize {
        self.products.iter().filter(|p| p.created).count()
    }
}

/// Ensure every product whose category resolves exists.
///
/// The vendor profile is looked up by its owning account's email and each
/// category slug is looked up in the store, so categories and vendors left by
/// an earlier run are honoured. `accounts` and `categories` are the outputs of
/// the earlier stages; they only refine the diagnostics for skipped products.
///
/// # Errors
///
/// Returns `SeedError::Store` if a store call fails and `SeedError::Encoding`
/// if tags or images cannot be encoded.
#[instrument(skip_all, fields(vendor = %catalog.vendor, products = catalog.products.len()))]
pub async fn seed_catalog<S: SeedStore>(
    store: &S,
    catalog: &CatalogFixture,
    accounts: &ProvisionedAccounts,
    categories: &CategoryIndex,
) -> Result<CatalogOutcome, SeedError> {
    let mut outcome = CatalogOutcome::default();

    let Some(vendor) = store.find_vendor_by_user_email(&catalog.vendor).await? else {
        warn_vendor_missing(&catalog.vendor, accounts);
        outcome.skipped = catalog
            .products
            .iter()
            .map(|p| SkippedProduct {
                slug: p.slug.clone(),
                category: p.category.clone(),
                reason: SkipReason::VendorMissing,
            })
            .collect();
        return Ok(outcome);
    };
    outcome.vendor_id = Some(vendor.id);

    for product in &catalog.products {
        let Some(category) = store.find_category_by_slug(&product.category).await? else {
            if categories.contains(&product.category) {
                warn!(
                    product = %product.slug,
                    category = %product.category,
                    "Skipping product: category was seeded but is no longer in the store"
                );
            } else {
                warn!(
                    product = %product.slug,
                    category = %product.category,
                    "Skipping product: category is not part of the seeded taxonomy"
                );
            }
            outcome.skipped.push(SkippedProduct {
                slug: product.slug.clone(),
                category: product.category.clone(),
                reason: SkipReason::CategoryMissing,
            });
            continue;
        };

        let upserted = store
            .upsert_product(new_product(product, vendor.id, category.id)?)
            .await?;

        let record = upserted.record;
        if upserted.created {
            info!(slug = %record.slug, category = %category.slug, "Product created: {}", record.title);
        } else {
            info!(slug = %record.slug, "Product already present: {}", record.title);
        }
        outcome.products.push(SeededProduct {
            id: record.id,
            slug: record.slug,
            created: upserted.created,
        });
    }

    Ok(outcome)
}

fn warn_vendor_missing(email: &Email, accounts: &ProvisionedAccounts) {
    match accounts.get(email) {
        Some(account) => warn!(
            vendor = %email,
            role = %account.role,
            "Skipping catalog: account exists but has no vendor profile"
        ),
        None => warn!(vendor = %email, "Skipping catalog: vendor account not found"),
    }
}

fn new_product(
    fixture: &ProductFixture,
    vendor_id: VendorId,
    category_id: marketplace_core::CategoryId,
) -> Result<NewProduct, SeedError> {
    Ok(NewProduct {
        title: fixture.title.clone(),
        slug: fixture.slug.clone(),
        description: fixture.description.clone(),
        short_description: fixture.short_description.clone(),
        price: fixture.price,
        compare_at_price: fixture.compare_at_price,
        inventory: fixture.inventory,
        is_featured: fixture.is_featured,
        tags: encode_list(&fixture.tags)?,
        images: encode_list(&fixture.images)?,
        vendor_id,
        category_id,
    })
}

/// Encode a string list for a text column (JSON array).
///
/// # Errors
///
/// Returns `serde_json::Error` if serialization fails.
pub fn encode_list(items: &[String]) -> Result<String, serde_json::Error> {
    serde_json::to_string(items)
}

/// Decode a string list written by [`encode_list`].
///
/// # Errors
///
/// Returns `serde_json::Error` if the text is not a JSON array of strings.
pub fn decode_list(encoded: &str) -> Result<Vec<String>, serde_json::Error> {
    serde_json::from_str(encoded)
}
