//! Credential hashing for seeded accounts.
//!
//! Digests are Argon2id PHC strings with a random salt, so hashing the same
//! password twice never yields the same digest. That is why account seeding
//! relies on the store keeping an existing row untouched: a re-run hashes the
//! fixture password again but the fresh digest is simply discarded.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::SeedError;

/// Memory cost in KiB (19 MiB).
pub const MEMORY_COST_KIB: u32 = 19 * 1024;
/// Number of passes over memory.
pub const TIME_COST: u32 = 2;
/// Degree of parallelism.
pub const PARALLELISM: u32 = 1;

/// Argon2id hasher with fixed cost parameters.
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params = self.argon2.params();
        f.debug_struct("CredentialHasher")
            .field("memory_kib", &params.m_cost())
            .field("time_cost", &params.t_cost())
            .field("parallelism", &params.p_cost())
            .finish()
    }
}

impl CredentialHasher {
    /// Hasher with the documented production cost.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::PasswordHash` if the cost constants are rejected by
    /// the `argon2` crate.
    pub fn new() -> Result<Self, SeedError> {
        Self::with_cost(MEMORY_COST_KIB, TIME_COST, PARALLELISM)
    }

    /// Hasher with explicit cost parameters.
    ///
    /// Tests use the smallest accepted parameters to keep runs fast.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::PasswordHash` if the parameters are out of range.
    pub fn with_cost(memory_kib: u32, time_cost: u32, parallelism: u32) -> Result<Self, SeedError> {
        let params = Params::new(memory_kib, time_cost, parallelism, None)
            .map_err(|e| SeedError::PasswordHash(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a plaintext password into a PHC string.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::PasswordHash` if hashing fails.
    pub fn hash(&self, password: &str) -> Result<String, SeedError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| SeedError::PasswordHash(e.to_string()))
    }

    /// Check a plaintext password against a stored digest.
    ///
    /// Malformed digests verify as `false`.
    #[must_use]
    pub fn verify(&self, password: &str, digest: &str) -> bool {
        PasswordHash::new(digest).is_ok_and(|parsed| {
            self.argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
    }
}
