//! Records exchanged with a [`SeedStore`](crate::db::SeedStore).
//!
//! `New*` types are the create payloads of the insert-or-update calls. The
//! matching `*Record` types are what the store hands back after the call,
//! whether the row was created by it or already existed.

use chrono::{DateTime, Utc};

use marketplace_core::{
    CategoryId, CustomerId, Email, Price, ProductId, SettingId, SettingType, Slug, UserId,
    UserRole, VendorId,
};

/// Result of an insert-or-update call whose update branch is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upserted<T> {
    /// The persisted row.
    pub record: T,
    /// `true` if this call inserted the row, `false` if it already existed.
    pub created: bool,
}

impl<T> Upserted<T> {
    /// Wrap a row this call inserted.
    pub const fn created(record: T) -> Self {
        Self {
            record,
            created: true,
        }
    }

    /// Wrap a row that was already present.
    pub const fn existing(record: T) -> Self {
        Self {
            record,
            created: false,
        }
    }
}

// =============================================================================
// Accounts
// =============================================================================

/// Create payload for an account and its owned profile.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub name: String,
    /// PHC-formatted credential digest, never a plaintext password.
    pub password_hash: String,
    pub role: UserRole,
    pub profile: NewProfile,
}

/// Role-specific profile created in the same transaction as its account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewProfile {
    /// Admins own no profile.
    None,
    Customer,
    Vendor(NewVendor),
}

/// Create payload for a vendor store profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVendor {
    pub store_name: String,
    pub store_slug: Slug,
    pub description: Option<String>,
    pub is_approved: bool,
    pub is_active: bool,
}

/// A persisted account.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserRecord {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// A persisted customer profile.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CustomerRecord {
    pub id: CustomerId,
    pub user_id: UserId,
}

/// A persisted vendor store profile.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct VendorRecord {
    pub id: VendorId,
    pub user_id: UserId,
    pub store_name: String,
    pub store_slug: Slug,
    pub description: Option<String>,
    pub is_approved: bool,
    pub is_active: bool,
}

// =============================================================================
// Categories
// =============================================================================

/// Create payload for a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub slug: Slug,
    pub description: Option<String>,
    pub parent_id: Option<CategoryId>,
    pub sort_order: i32,
}

/// A persisted category.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CategoryRecord {
    pub id: CategoryId,
    pub name: String,
    pub slug: Slug,
    pub description: Option<String>,
    pub parent_id: Option<CategoryId>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Products
// =============================================================================

/// Create payload for a product.
///
/// `tags` and `images` are already encoded; see
/// [`encode_list`](crate::stages::catalog::encode_list).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub title: String,
    pub slug: Slug,
    pub description: String,
    pub short_description: Option<String>,
    pub price: Price,
    pub compare_at_price: Option<Price>,
    pub inventory: i32,
    pub is_featured: bool,
    pub tags: String,
    pub images: String,
    pub vendor_id: VendorId,
    pub category_id: CategoryId,
}

/// A persisted product.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ProductRecord {
    pub id: ProductId,
    pub title: String,
    pub slug: Slug,
    pub description: String,
    pub short_description: Option<String>,
    pub price: Price,
    pub compare_at_price: Option<Price>,
    pub inventory: i32,
    pub is_featured: bool,
    pub tags: String,
    pub images: String,
    pub vendor_id: VendorId,
    pub category_id: CategoryId,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Settings
// =============================================================================

/// Create payload for a global setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSetting {
    pub key: String,
    pub value: String,
    pub value_type: SettingType,
}

/// A persisted global setting.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct SettingRecord {
    pub id: SettingId,
    pub key: String,
    pub value: String,
    #[sqlx(rename = "type")]
    pub value_type: SettingType,
    pub created_at: DateTime<Utc>,
}
