//! SurrealDB directory implementations.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DirectoryError;

mod role;
mod user;

pub use role::SurrealRoleDirectory;
pub use user::SurrealUserDirectory;

#[derive(Debug, SurrealValue)]
struct SequenceRow {
    value: i64,
}

/// Atomically bump and return the per-table id sequence. A single
/// UPSERT statement, so two concurrent callers can never observe the
/// same value.
pub(crate) async fn next_id<C: Connection>(
    db: &Surreal<C>,
    table: &str,
) -> Result<i64, DirectoryError> {
    let mut result = db
        .query("UPSERT type::record('sequence', $table) SET value += 1 RETURN AFTER")
        .bind(("table", table.to_string()))
        .await?;

    let rows: Vec<SequenceRow> = result.take(0)?;
    rows.into_iter()
        .next()
        .map(|row| row.value)
        .ok_or_else(|| DirectoryError::Query("sequence update returned no row".into()))
}
