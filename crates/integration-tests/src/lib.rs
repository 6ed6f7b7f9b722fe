//! Integration tests for the marketplace seeder.
//!
//! # Running Tests
//!
//! ```bash
//! # In-memory scenarios (no database needed)
//! cargo test -p marketplace-integration-tests
//!
//! # PostgreSQL scenarios
//! export MARKETPLACE_DATABASE_URL=postgres://localhost/marketplace_test
//! cargo test -p marketplace-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `seed_scenarios` - full pipeline runs against the in-memory store
//! - `seed_postgres` - full pipeline runs against `PostgreSQL`

use secrecy::SecretString;

use marketplace_seed::{CredentialHasher, SeedError};

/// Cheapest hasher `argon2` accepts.
///
/// # Errors
///
/// Returns `SeedError::PasswordHash` if the parameters are rejected.
pub fn fast_hasher() -> Result<CredentialHasher, SeedError> {
    CredentialHasher::with_cost(8, 1, 1)
}

/// Database URL for `PostgreSQL` tests, if one is configured.
#[must_use]
pub fn test_database_url() -> Option<SecretString> {
    dotenvy::dotenv().ok();
    std::env::var("MARKETPLACE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .map(SecretString::from)
}
