//! Role and type-tag enums for seeded entities.

use serde::{Deserialize, Serialize};

/// Account role.
///
/// Each role may own a role-specific profile: customers own a customer
/// profile and vendors own a vendor (store) profile. Admins own nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "marketplace.user_role", rename_all = "UPPERCASE")
)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// Full access to platform administration.
    Admin,
    /// Shopper with a customer profile.
    Customer,
    /// Seller with a vendor store profile.
    Vendor,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "ADMIN"),
            Self::Customer => write!(f, "CUSTOMER"),
            Self::Vendor => write!(f, "VENDOR"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "CUSTOMER" => Ok(Self::Customer),
            "VENDOR" => Ok(Self::Vendor),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

/// Declared type of a global setting value.
///
/// Settings are always stored as strings; the tag tells consumers how to
/// interpret the value. It is not enforced when a setting is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "marketplace.setting_type", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    #[default]
    String,
    Number,
}

impl std::fmt::Display for SettingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
        }
    }
}

impl std::str::FromStr for SettingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            _ => Err(format!("invalid setting type: {s}")),
        }
    }
}
