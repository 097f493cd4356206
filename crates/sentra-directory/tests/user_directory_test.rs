//! Integration tests for the user directory using in-memory SurrealDB.

use sentra_core::directory::UserDirectory;
use sentra_core::error::SentraError;
use sentra_core::models::user::DEFAULT_PICTURE;
use sentra_core::models::{NewUser, Provider, RoleName, UserStatus, UserUpdate};
use sentra_directory::{SurrealUserDirectory, run_migrations};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

/// Helper: spin up an in-memory DB and run migrations.
async fn setup() -> SurrealUserDirectory<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    run_migrations(&db).await.unwrap();
    SurrealUserDirectory::new(db)
}

fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.into(),
        display_name: "Alice".into(),
        picture: None,
        password: "correct-horse-battery".into(),
        provider: Provider::Local,
        provider_user_id: None,
        roles: vec![RoleName::User],
    }
}

#[tokio::test]
async fn create_and_find_user() {
    let directory = setup().await;

    let user = directory.create(new_user("alice@example.com")).await.unwrap();
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.display_name, "Alice");
    assert_eq!(user.picture, DEFAULT_PICTURE);
    assert_eq!(user.provider, Provider::Local);
    assert_eq!(user.roles, vec![RoleName::User]);
    assert!(user.enabled);
    assert_eq!(user.status, UserStatus::Active);
    // The raw password is hashed before storage.
    assert_ne!(user.password_hash, "correct-horse-battery");
    assert!(user.password_hash.starts_with("$argon2id$"));

    let by_id = directory.find_by_id(user.id).await.unwrap();
    assert_eq!(by_id.email, user.email);

    let by_email = directory.find_by_email("alice@example.com").await.unwrap();
    assert_eq!(by_email.id, user.id);
}

#[tokio::test]
async fn ids_are_assigned_in_sequence() {
    let directory = setup().await;

    let first = directory.create(new_user("a@example.com")).await.unwrap();
    let second = directory.create(new_user("b@example.com")).await.unwrap();
    assert!(second.id > first.id);
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let directory = setup().await;

    directory.create(new_user("alice@example.com")).await.unwrap();
    let result = directory.create(new_user("alice@example.com")).await;
    assert!(matches!(result, Err(SentraError::AlreadyExists { .. })));
}

#[tokio::test]
async fn concurrent_creates_for_one_email_admit_exactly_one() {
    let directory = setup().await;

    let (left, right) = tokio::join!(
        directory.create(new_user("race@example.com")),
        directory.create(new_user("race@example.com")),
    );

    let successes = [&left, &right].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one create may win the race");

    let loser = if left.is_err() { left } else { right };
    assert!(matches!(loser, Err(SentraError::AlreadyExists { .. })));
}

#[tokio::test]
async fn emails_are_case_sensitive() {
    let directory = setup().await;

    directory.create(new_user("Alice@example.com")).await.unwrap();
    let result = directory.find_by_email("alice@example.com").await;
    assert!(matches!(result, Err(SentraError::NotFound { .. })));
}

#[tokio::test]
async fn update_changes_only_given_fields() {
    let directory = setup().await;
    let user = directory.create(new_user("alice@example.com")).await.unwrap();

    let updated = directory
        .update(
            user.id,
            UserUpdate {
                display_name: Some("Alice Cooper".into()),
                roles: Some(vec![RoleName::User, RoleName::Moderator]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.display_name, "Alice Cooper");
    assert_eq!(updated.roles, vec![RoleName::User, RoleName::Moderator]);
    // Untouched fields survive.
    assert_eq!(updated.email, "alice@example.com");
    assert_eq!(updated.picture, user.picture);
    assert!(updated.modified_at >= user.modified_at);
}

#[tokio::test]
async fn update_to_taken_email_is_rejected() {
    let directory = setup().await;
    directory.create(new_user("alice@example.com")).await.unwrap();
    let bob = directory.create(new_user("bob@example.com")).await.unwrap();

    let result = directory
        .update(
            bob.id,
            UserUpdate {
                email: Some("alice@example.com".into()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(SentraError::AlreadyExists { .. })));
}

#[tokio::test]
async fn deactivate_is_a_soft_delete() {
    let directory = setup().await;
    let user = directory.create(new_user("alice@example.com")).await.unwrap();

    directory.deactivate(user.id).await.unwrap();

    // The record is still there, just disabled and suspended.
    let after = directory.find_by_id(user.id).await.unwrap();
    assert!(!after.enabled);
    assert_eq!(after.status, UserStatus::Suspended);
}

#[tokio::test]
async fn deactivate_unknown_user_is_not_found() {
    let directory = setup().await;
    let result = directory.deactivate(999).await;
    assert!(matches!(result, Err(SentraError::NotFound { .. })));
}

#[tokio::test]
async fn list_others_excludes_the_given_user() {
    let directory = setup().await;
    let alice = directory.create(new_user("alice@example.com")).await.unwrap();
    directory.create(new_user("bob@example.com")).await.unwrap();
    directory.create(new_user("carol@example.com")).await.unwrap();

    let all = directory.list().await.unwrap();
    assert_eq!(all.len(), 3);

    let others = directory.list_others(alice.id).await.unwrap();
    assert_eq!(others.len(), 2);
    assert!(others.iter().all(|u| u.id != alice.id));
}
