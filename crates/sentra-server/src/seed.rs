//! Idempotent seed data: the role vocabulary and a handful of local
//! accounts.
//!
//! Every record is guarded by its own existence check, so seeding can
//! run on every startup — and on several instances at once — without
//! duplicating anything.

use sentra_core::directory::{RoleDirectory, UserDirectory};
use sentra_core::error::{SentraError, SentraResult};
use sentra_core::models::{NewUser, Provider, RoleName};
use tracing::info;

const SEED_PASSWORD: &str = "admin123";

pub async fn run(users: &impl UserDirectory, roles: &impl RoleDirectory) -> SentraResult<()> {
    for name in RoleName::ALL {
        roles.ensure(name).await?;
    }

    ensure_user(users, "admin@test.com", "Admin", RoleName::ALL.to_vec()).await?;
    ensure_user(users, "johndoe@test.com", "john", vec![RoleName::User]).await?;
    ensure_user(users, "janedoe@test.com", "jane", vec![RoleName::User]).await?;
    ensure_user(users, "jimdoe@test.com", "jim", vec![RoleName::User]).await?;
    ensure_user(users, "joecitizen@test.com", "joe", vec![RoleName::User]).await?;

    Ok(())
}

async fn ensure_user(
    users: &impl UserDirectory,
    email: &str,
    display_name: &str,
    roles: Vec<RoleName>,
) -> SentraResult<()> {
    match users.find_by_email(email).await {
        Ok(_) => Ok(()),
        Err(SentraError::NotFound { .. }) => {
            let created = users
                .create(NewUser {
                    email: email.into(),
                    display_name: display_name.into(),
                    picture: None,
                    password: SEED_PASSWORD.into(),
                    provider: Provider::Local,
                    provider_user_id: None,
                    roles,
                })
                .await;
            match created {
                Ok(user) => {
                    info!(email, user_id = user.id, "seeded user");
                    Ok(())
                }
                // Another instance seeded it between our check and
                // create; that is the outcome we wanted.
                Err(SentraError::AlreadyExists { .. }) => Ok(()),
                Err(e) => Err(e),
            }
        }
        Err(e) => Err(e),
    }
}
