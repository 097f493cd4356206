//! Integration tests for federated identity reconciliation.

use sentra_auth::reconcile::FederatedIdentityReconciler;
use sentra_core::directory::UserDirectory;
use sentra_core::error::SentraError;
use sentra_core::models::{ExternalIdentity, NewUser, Provider, RoleName, UserStatus};
use sentra_directory::{SurrealUserDirectory, run_migrations};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

async fn setup() -> SurrealUserDirectory<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    run_migrations(&db).await.unwrap();
    SurrealUserDirectory::new(db)
}

fn jane_identity() -> ExternalIdentity {
    ExternalIdentity {
        provider_user_id: Some("108234".into()),
        name: Some("Jane Doe".into()),
        email: Some("jane@x.com".into()),
        picture: Some("https://lh3.example.com/jane.jpg".into()),
    }
}

#[tokio::test]
async fn first_login_creates_an_enabled_user() {
    let directory = setup().await;
    let reconciler = FederatedIdentityReconciler::new(directory.clone());

    let principal = reconciler
        .reconcile(Provider::Google, &jane_identity())
        .await
        .unwrap();

    assert_eq!(principal.email, "jane@x.com");
    assert_eq!(principal.display_name, "Jane Doe");
    assert_eq!(principal.provider, Provider::Google);
    assert_eq!(principal.roles, vec![RoleName::User]);
    assert!(principal.enabled);
    assert_eq!(principal.status, UserStatus::Active);

    // The backing record got a hashed random password.
    let user = directory.find_by_email("jane@x.com").await.unwrap();
    assert!(user.password_hash.starts_with("$argon2id$"));
    assert_eq!(user.provider_user_id.as_deref(), Some("108234"));
}

#[tokio::test]
async fn repeat_login_updates_name_and_picture() {
    let directory = setup().await;
    let reconciler = FederatedIdentityReconciler::new(directory.clone());

    reconciler
        .reconcile(Provider::Google, &jane_identity())
        .await
        .unwrap();

    let mut fresh = jane_identity();
    fresh.name = Some("Jane Q. Doe".into());
    fresh.picture = Some("https://lh3.example.com/jane-new.jpg".into());

    let principal = reconciler.reconcile(Provider::Google, &fresh).await.unwrap();
    assert_eq!(principal.display_name, "Jane Q. Doe");
    assert_eq!(principal.picture, "https://lh3.example.com/jane-new.jpg");

    // Still one account.
    assert_eq!(directory.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn federated_login_attaches_to_existing_local_account() {
    let directory = setup().await;
    directory
        .create(NewUser {
            email: "jane@x.com".into(),
            display_name: "Jane (local)".into(),
            picture: None,
            password: "local-password".into(),
            provider: Provider::Local,
            provider_user_id: None,
            roles: vec![RoleName::User],
        })
        .await
        .unwrap();

    let reconciler = FederatedIdentityReconciler::new(directory.clone());
    let principal = reconciler
        .reconcile(Provider::Google, &jane_identity())
        .await
        .unwrap();

    // Name and picture refresh from the provider; the recorded
    // provider stays local.
    assert_eq!(principal.display_name, "Jane Doe");
    let user = directory.find_by_email("jane@x.com").await.unwrap();
    assert_eq!(user.provider, Provider::Local);
}

#[tokio::test]
async fn cross_provider_login_is_rejected() {
    let directory = setup().await;
    let reconciler = FederatedIdentityReconciler::new(directory.clone());

    reconciler
        .reconcile(Provider::Google, &jane_identity())
        .await
        .unwrap();

    let result = reconciler.reconcile(Provider::Facebook, &jane_identity()).await;
    match result {
        Err(SentraError::ProviderMismatch { existing }) => assert_eq!(existing, "google"),
        other => panic!("expected ProviderMismatch, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_email_rejects_without_creating_a_user() {
    let directory = setup().await;
    let reconciler = FederatedIdentityReconciler::new(directory.clone());

    let mut identity = jane_identity();
    identity.email = None;

    let result = reconciler.reconcile(Provider::Google, &identity).await;
    assert!(matches!(
        result,
        Err(SentraError::IdentityIncomplete { field: "email" })
    ));
    assert!(directory.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_name_rejects_the_login() {
    let directory = setup().await;
    let reconciler = FederatedIdentityReconciler::new(directory);

    let mut identity = jane_identity();
    identity.name = None;

    let result = reconciler.reconcile(Provider::Google, &identity).await;
    assert!(matches!(
        result,
        Err(SentraError::IdentityIncomplete { field: "name" })
    ));
}

#[tokio::test]
async fn concurrent_first_logins_converge_on_one_account() {
    let directory = setup().await;
    let reconciler = FederatedIdentityReconciler::new(directory.clone());

    // Both logins race the check-then-create window; the storage-level
    // unique index makes one create lose, and the reconciler turns
    // that into a lookup-and-update rather than a failure.
    let left_identity = jane_identity();
    let right_identity = jane_identity();
    let (left, right) = tokio::join!(
        reconciler.reconcile(Provider::Google, &left_identity),
        reconciler.reconcile(Provider::Google, &right_identity),
    );

    let left = left.unwrap();
    let right = right.unwrap();
    assert_eq!(left.id, right.id);
    assert_eq!(directory.list().await.unwrap().len(), 1);
}
