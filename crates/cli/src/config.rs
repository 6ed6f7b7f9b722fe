//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `MARKETPLACE_DATABASE_URL` - `PostgreSQL` connection string
//! - `DATABASE_URL` - fallback when the above is unset
//!
//! A `.env` file in the working directory is honoured.

use secrecy::SecretString;
use thiserror::Error;

/// Primary database URL variable.
pub const DATABASE_URL_VAR: &str = "MARKETPLACE_DATABASE_URL";
/// Generic fallback, as set by most hosted `PostgreSQL` attachments.
pub const FALLBACK_DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Settings shared by every database command.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL (contains password)
    pub database_url: SecretString,
}

impl DatabaseConfig {
    /// Load configuration from the process environment and `.env`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if no database URL is set or it is blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if no database URL is set or it is blank.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: get_database_url(&lookup)?,
        })
    }
}

/// Database URL with fallback to the generic `DATABASE_URL`.
fn get_database_url(lookup: &impl Fn(&str) -> Option<String>) -> Result<SecretString, ConfigError> {
    let (key, value) = lookup(DATABASE_URL_VAR)
        .map(|v| (DATABASE_URL_VAR, v))
        .or_else(|| lookup(FALLBACK_DATABASE_URL_VAR).map(|v| (FALLBACK_DATABASE_URL_VAR, v)))
        .ok_or_else(|| ConfigError::MissingEnvVar(DATABASE_URL_VAR.to_owned()))?;

    if value.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_owned(),
            "must not be empty".to_owned(),
        ));
    }
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_prefers_marketplace_url() {
        let config = DatabaseConfig::from_lookup(lookup(&[
            ("MARKETPLACE_DATABASE_URL", "postgres://primary/db"),
            ("DATABASE_URL", "postgres://fallback/db"),
        ]))
        .unwrap();
        assert_eq!(config.database_url.expose_secret(), "postgres://primary/db");
    }

    #[test]
    fn test_falls_back_to_database_url() {
        let config =
            DatabaseConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://fallback/db")]))
                .unwrap();
        assert_eq!(config.database_url.expose_secret(), "postgres://fallback/db");
    }

    #[test]
    fn test_missing_url() {
        let err = DatabaseConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "MARKETPLACE_DATABASE_URL"));
    }

    #[test]
    fn test_blank_url() {
        let err = DatabaseConfig::from_lookup(lookup(&[("MARKETPLACE_DATABASE_URL", "  ")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_debug_redacts_url() {
        let config =
            DatabaseConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://u:hunter2@h/db")]))
                .unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
