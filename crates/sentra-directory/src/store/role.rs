//! SurrealDB implementation of [`RoleDirectory`].

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sentra_core::directory::RoleDirectory;
use sentra_core::error::{SentraError, SentraResult};
use sentra_core::models::role::{Role, RoleName};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DirectoryError;
use crate::store::next_id;

#[derive(Debug, SurrealValue)]
struct RoleRow {
    name: String,
    created_at: DateTime<Utc>,
}

impl RoleRow {
    fn into_role(self, id: i64) -> Result<Role, DirectoryError> {
        Ok(Role {
            id,
            name: RoleName::from_str(&self.name).map_err(DirectoryError::Corrupt)?,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct RoleRowWithId {
    record_id: String,
    name: String,
    created_at: DateTime<Utc>,
}

impl RoleRowWithId {
    fn try_into_role(self) -> Result<Role, DirectoryError> {
        let id: i64 = self
            .record_id
            .parse()
            .map_err(|_| DirectoryError::Corrupt(format!("invalid role id: {}", self.record_id)))?;
        Ok(Role {
            id,
            name: RoleName::from_str(&self.name).map_err(DirectoryError::Corrupt)?,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the role directory.
#[derive(Clone)]
pub struct SurrealRoleDirectory<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRoleDirectory<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn create(&self, name: RoleName) -> SentraResult<Role> {
        let id = next_id(&self.db, "role").await?;
        let id_str = id.to_string();

        let result = self
            .db
            .query("CREATE type::record('role', $id) SET name = $name")
            .bind(("id", id_str.clone()))
            .bind(("name", name.as_str().to_string()))
            .await
            .map_err(DirectoryError::from)?;

        let mut result = result.check().map_err(|e| {
            let message = e.to_string();
            if message.contains("idx_role_name") {
                DirectoryError::AlreadyExists {
                    entity: "role".into(),
                    key: name.to_string(),
                }
            } else {
                DirectoryError::Query(message)
            }
        })?;

        let rows: Vec<RoleRow> = result.take(0).map_err(DirectoryError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DirectoryError::NotFound {
                entity: "role".into(),
                id: id_str,
            })?;

        Ok(row.into_role(id)?)
    }
}

impl<C: Connection> RoleDirectory for SurrealRoleDirectory<C> {
    async fn ensure(&self, name: RoleName) -> SentraResult<Role> {
        match self.find_by_name(name).await {
            Ok(role) => Ok(role),
            Err(SentraError::NotFound { .. }) => match self.create(name).await {
                Ok(role) => Ok(role),
                // Lost a create race; the record exists now.
                Err(SentraError::AlreadyExists { .. }) => self.find_by_name(name).await,
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        }
    }

    async fn find_by_name(&self, name: RoleName) -> SentraResult<Role> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM role \
                 WHERE name = $name",
            )
            .bind(("name", name.as_str().to_string()))
            .await
            .map_err(DirectoryError::from)?;

        let rows: Vec<RoleRowWithId> = result.take(0).map_err(DirectoryError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DirectoryError::NotFound {
                entity: "role".into(),
                id: name.to_string(),
            })?;

        Ok(row.try_into_role()?)
    }

    async fn list(&self) -> SentraResult<Vec<Role>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM role \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DirectoryError::from)?;

        let rows: Vec<RoleRowWithId> = result.take(0).map_err(DirectoryError::from)?;
        let roles = rows
            .into_iter()
            .map(RoleRowWithId::try_into_role)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(roles)
    }
}
