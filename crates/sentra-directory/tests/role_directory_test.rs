//! Integration tests for the role directory using in-memory SurrealDB.

use sentra_core::directory::RoleDirectory;
use sentra_core::error::SentraError;
use sentra_core::models::RoleName;
use sentra_directory::{SurrealRoleDirectory, run_migrations};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

async fn setup() -> SurrealRoleDirectory<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    run_migrations(&db).await.unwrap();
    SurrealRoleDirectory::new(db)
}

#[tokio::test]
async fn ensure_creates_then_reuses() {
    let directory = setup().await;

    let first = directory.ensure(RoleName::Admin).await.unwrap();
    assert_eq!(first.name, RoleName::Admin);

    // Second ensure returns the same record, not a duplicate.
    let second = directory.ensure(RoleName::Admin).await.unwrap();
    assert_eq!(second.id, first.id);

    let roles = directory.list().await.unwrap();
    assert_eq!(roles.len(), 1);
}

#[tokio::test]
async fn find_by_name_on_empty_vocabulary_is_not_found() {
    let directory = setup().await;
    let result = directory.find_by_name(RoleName::Moderator).await;
    assert!(matches!(result, Err(SentraError::NotFound { .. })));
}

#[tokio::test]
async fn full_vocabulary_can_be_seeded() {
    let directory = setup().await;

    for name in RoleName::ALL {
        directory.ensure(name).await.unwrap();
    }

    let roles = directory.list().await.unwrap();
    assert_eq!(roles.len(), 3);
}
