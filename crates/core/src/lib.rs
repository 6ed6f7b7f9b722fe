//! Marketplace Core - Shared domain types.
//!
//! This crate provides the types used by the marketplace seeding workspace:
//! - `seed` - Fixture loading, seeding stages and store implementations
//! - `cli` - Command-line entry point for seeding and migrations
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access. Database
//! encoding for the newtypes lives behind the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, slugs, prices and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
