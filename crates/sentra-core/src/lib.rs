//! Sentra Core — domain models, the shared error taxonomy, and the
//! directory trait contracts.
//!
//! This crate has no I/O and no cryptography; it is the vocabulary the
//! other crates speak.

pub mod directory;
pub mod error;
pub mod models;

pub use directory::{RoleDirectory, UserDirectory};
pub use error::{SentraError, SentraResult};
