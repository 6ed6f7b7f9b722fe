//! Seeding error types.

use thiserror::Error;

use crate::db::StoreError;

/// Errors that abort a seeding run.
///
/// A product skipped because its category is missing is not an error; see
/// [`SkippedProduct`](crate::stages::catalog::SkippedProduct).
#[derive(Debug, Error)]
pub enum SeedError {
    /// A store call failed. Never retried.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The fixture document could not be parsed.
    #[error("invalid fixture document: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The fixture document parsed but failed validation.
    #[error("{} fixture validation error(s): {}", .0.len(), .0.join("; "))]
    InvalidPlan(Vec<String>),

    /// Tags or image references could not be encoded.
    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Password hashing failed.
    #[error("password hashing error: {0}")]
    PasswordHash(String),
}
