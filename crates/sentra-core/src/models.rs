//! Domain models.

pub mod identity;
pub mod principal;
pub mod role;
pub mod user;

pub use identity::ExternalIdentity;
pub use principal::Principal;
pub use role::{Role, RoleName};
pub use user::{NewUser, Provider, User, UserStatus, UserUpdate};
