//! Directory-specific error types and conversions.

use sentra_core::error::SentraError;

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("{entity} already exists: {key}")]
    AlreadyExists { entity: String, key: String },

    #[error("record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    /// A stored value no longer parses into its domain type.
    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<DirectoryError> for SentraError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::AlreadyExists { entity, key } => {
                SentraError::AlreadyExists { entity, key }
            }
            DirectoryError::NotFound { entity, id } => SentraError::NotFound { entity, id },
            DirectoryError::Crypto(msg) => SentraError::Crypto(msg),
            other => SentraError::Directory(other.to_string()),
        }
    }
}
