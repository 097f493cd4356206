//! Sentra Directory — SurrealDB connection management and the
//! directory trait implementations.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Error types ([`DirectoryError`])
//! - [`SurrealUserDirectory`] / [`SurrealRoleDirectory`], the store
//!   implementations of the `sentra-core` directory traits

mod connection;
mod error;
mod schema;
mod store;

pub use connection::{DbConfig, DbManager};
pub use error::DirectoryError;
pub use schema::run_migrations;
pub use store::{SurrealRoleDirectory, SurrealUserDirectory};
