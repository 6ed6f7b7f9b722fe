//! CLI error type.

use thiserror::Error;

use marketplace_seed::{SeedError, StoreError};

use crate::config::ConfigError;

/// Errors surfaced by `mp-cli` commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Seed(#[from] SeedError),
}
