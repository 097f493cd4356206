//! SurrealDB implementation of [`UserDirectory`].
//!
//! Password hashing uses Argon2id with OWASP-recommended parameters
//! (memory: 19 MiB, iterations: 2, parallelism: 1). Salt is randomly
//! generated per hash. Numeric ids come from the shared sequence
//! table; the UNIQUE index on `email` turns racing creates into an
//! `AlreadyExists` for the loser.

use std::str::FromStr;

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use chrono::{DateTime, Utc};
use sentra_core::directory::UserDirectory;
use sentra_core::error::SentraResult;
use sentra_core::models::user::{DEFAULT_PICTURE, NewUser, Provider, User, UserStatus, UserUpdate};
use sentra_core::models::RoleName;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DirectoryError;
use crate::store::next_id;

/// DB-side row struct for queries where the numeric id is already
/// known.
#[derive(Debug, SurrealValue)]
struct UserRow {
    email: String,
    display_name: String,
    picture: String,
    password_hash: String,
    provider: String,
    provider_user_id: Option<String>,
    roles: Vec<String>,
    enabled: bool,
    status: String,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record id via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct UserRowWithId {
    record_id: String,
    email: String,
    display_name: String,
    picture: String,
    password_hash: String,
    provider: String,
    provider_user_id: Option<String>,
    roles: Vec<String>,
    enabled: bool,
    status: String,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

fn parse_roles(raw: Vec<String>) -> Result<Vec<RoleName>, DirectoryError> {
    raw.iter()
        .map(|name| RoleName::from_str(name).map_err(DirectoryError::Corrupt))
        .collect()
}

impl UserRow {
    fn into_user(self, id: i64) -> Result<User, DirectoryError> {
        Ok(User {
            id,
            email: self.email,
            display_name: self.display_name,
            picture: self.picture,
            password_hash: self.password_hash,
            provider: Provider::from_str(&self.provider).map_err(DirectoryError::Corrupt)?,
            provider_user_id: self.provider_user_id,
            roles: parse_roles(self.roles)?,
            enabled: self.enabled,
            status: UserStatus::from_str(&self.status).map_err(DirectoryError::Corrupt)?,
            created_at: self.created_at,
            modified_at: self.modified_at,
        })
    }
}

impl UserRowWithId {
    fn try_into_user(self) -> Result<User, DirectoryError> {
        let id: i64 = self
            .record_id
            .parse()
            .map_err(|_| DirectoryError::Corrupt(format!("invalid user id: {}", self.record_id)))?;
        Ok(User {
            id,
            email: self.email,
            display_name: self.display_name,
            picture: self.picture,
            password_hash: self.password_hash,
            provider: Provider::from_str(&self.provider).map_err(DirectoryError::Corrupt)?,
            provider_user_id: self.provider_user_id,
            roles: parse_roles(self.roles)?,
            enabled: self.enabled,
            status: UserStatus::from_str(&self.status).map_err(DirectoryError::Corrupt)?,
            created_at: self.created_at,
            modified_at: self.modified_at,
        })
    }
}

/// Hash a password with Argon2id using OWASP-recommended parameters.
fn hash_password(password: &str) -> Result<String, DirectoryError> {
    // OWASP ASVS recommended: m=19456 (19 MiB), t=2, p=1
    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| DirectoryError::Crypto(format!("argon2 params error: {e}")))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DirectoryError::Crypto(format!("password hash error: {e}")))?;

    Ok(hash.to_string())
}

/// Map a failed write to `AlreadyExists` when the unique email index
/// was violated.
fn map_email_conflict(e: surrealdb::Error, email: &str) -> DirectoryError {
    let message = e.to_string();
    if message.contains("idx_user_email") {
        DirectoryError::AlreadyExists {
            entity: "user".into(),
            key: email.to_owned(),
        }
    } else {
        DirectoryError::Query(message)
    }
}

/// SurrealDB implementation of the user directory.
#[derive(Clone)]
pub struct SurrealUserDirectory<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealUserDirectory<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> UserDirectory for SurrealUserDirectory<C> {
    async fn create(&self, input: NewUser) -> SentraResult<User> {
        let id = next_id(&self.db, "user").await?;
        let id_str = id.to_string();

        let password_hash = hash_password(&input.password)?;
        let picture = input
            .picture
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PICTURE.to_owned());
        let roles: Vec<String> = input.roles.iter().map(|r| r.to_string()).collect();
        let email = input.email.clone();

        let result = self
            .db
            .query(
                "CREATE type::record('user', $id) SET \
                 email = $email, \
                 display_name = $display_name, \
                 picture = $picture, \
                 password_hash = $password_hash, \
                 provider = $provider, \
                 provider_user_id = $provider_user_id, \
                 roles = $roles, \
                 enabled = true, \
                 status = 'ACTIVE'",
            )
            .bind(("id", id_str.clone()))
            .bind(("email", input.email))
            .bind(("display_name", input.display_name))
            .bind(("picture", picture))
            .bind(("password_hash", password_hash))
            .bind(("provider", input.provider.as_str().to_string()))
            .bind(("provider_user_id", input.provider_user_id))
            .bind(("roles", roles))
            .await
            .map_err(DirectoryError::from)?;

        let mut result = result.check().map_err(|e| map_email_conflict(e, &email))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DirectoryError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DirectoryError::NotFound {
                entity: "user".into(),
                id: id_str,
            })?;

        Ok(row.into_user(id)?)
    }

    async fn find_by_id(&self, id: i64) -> SentraResult<User> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('user', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DirectoryError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DirectoryError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DirectoryError::NotFound {
                entity: "user".into(),
                id: id_str,
            })?;

        Ok(row.into_user(id)?)
    }

    async fn find_by_email(&self, email: &str) -> SentraResult<User> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE email = $email",
            )
            .bind(("email", email.to_string()))
            .await
            .map_err(DirectoryError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DirectoryError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DirectoryError::NotFound {
                entity: "user".into(),
                id: format!("email={email}"),
            })?;

        Ok(row.try_into_user()?)
    }

    async fn update(&self, id: i64, input: UserUpdate) -> SentraResult<User> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if input.display_name.is_some() {
            sets.push("display_name = $display_name");
        }
        if input.picture.is_some() {
            sets.push("picture = $picture");
        }
        if input.roles.is_some() {
            sets.push("roles = $roles");
        }
        if input.enabled.is_some() {
            sets.push("enabled = $enabled");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        sets.push("modified_at = time::now()");

        let query = format!(
            "UPDATE type::record('user', $id) SET {}",
            sets.join(", ")
        );

        let new_email = input.email.clone().unwrap_or_default();

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(display_name) = input.display_name {
            builder = builder.bind(("display_name", display_name));
        }
        if let Some(picture) = input.picture {
            builder = builder.bind(("picture", picture));
        }
        if let Some(roles) = input.roles {
            let roles: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
            builder = builder.bind(("roles", roles));
        }
        if let Some(enabled) = input.enabled {
            builder = builder.bind(("enabled", enabled));
        }
        if let Some(ref status) = input.status {
            builder = builder.bind(("status", status.as_str().to_string()));
        }

        let result = builder.await.map_err(DirectoryError::from)?;
        let mut result = result.check().map_err(|e| map_email_conflict(e, &new_email))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DirectoryError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DirectoryError::NotFound {
                entity: "user".into(),
                id: id_str,
            })?;

        Ok(row.into_user(id)?)
    }

    async fn list(&self) -> SentraResult<Vec<User>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DirectoryError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DirectoryError::from)?;
        let users = rows
            .into_iter()
            .map(UserRowWithId::try_into_user)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    async fn list_others(&self, id: i64) -> SentraResult<Vec<User>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE meta::id(id) != $id \
                 ORDER BY created_at ASC",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DirectoryError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DirectoryError::from)?;
        let users = rows
            .into_iter()
            .map(UserRowWithId::try_into_user)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    async fn deactivate(&self, id: i64) -> SentraResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('user', $id) SET \
                 enabled = false, status = 'SUSPENDED', \
                 modified_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .await
            .map_err(DirectoryError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DirectoryError::from)?;
        if rows.is_empty() {
            return Err(DirectoryError::NotFound {
                entity: "user".into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }
}
