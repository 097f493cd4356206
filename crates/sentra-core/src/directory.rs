//! Directory trait contracts for user and role persistence.
//!
//! The backing store is an external collaborator; these traits are the
//! whole of what the auth components may assume about it. All
//! operations are async. The store — not its callers — owns
//! consistency discipline for concurrent writes: `create` must enforce
//! email uniqueness at the storage layer so racing creates for one
//! email cannot both succeed.

use crate::error::SentraResult;
use crate::models::role::{Role, RoleName};
use crate::models::user::{NewUser, User, UserUpdate};

pub trait UserDirectory: Send + Sync {
    /// Create a user: hash the raw password, assign the next numeric
    /// id, and persist. Fails with `AlreadyExists` when the email is
    /// taken — including when a concurrent create won the race.
    fn create(&self, input: NewUser) -> impl Future<Output = SentraResult<User>> + Send;

    fn find_by_id(&self, id: i64) -> impl Future<Output = SentraResult<User>> + Send;

    fn find_by_email(&self, email: &str) -> impl Future<Output = SentraResult<User>> + Send;

    /// Apply a partial update and return the updated record.
    /// `modified_at` is bumped on every call.
    fn update(&self, id: i64, input: UserUpdate)
    -> impl Future<Output = SentraResult<User>> + Send;

    fn list(&self) -> impl Future<Output = SentraResult<Vec<User>>> + Send;

    /// All users except the given one.
    fn list_others(&self, id: i64) -> impl Future<Output = SentraResult<Vec<User>>> + Send;

    /// Soft delete: `enabled = false`, `status = SUSPENDED`. The
    /// record itself is never removed.
    fn deactivate(&self, id: i64) -> impl Future<Output = SentraResult<()>> + Send;
}

pub trait RoleDirectory: Send + Sync {
    /// Create the role record if it does not exist yet. Idempotent;
    /// used by seeding.
    fn ensure(&self, name: RoleName) -> impl Future<Output = SentraResult<Role>> + Send;

    fn find_by_name(&self, name: RoleName) -> impl Future<Output = SentraResult<Role>> + Send;

    fn list(&self) -> impl Future<Output = SentraResult<Vec<Role>>> + Send;
}
