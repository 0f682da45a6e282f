//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use chrono::{DateTime, Utc};
use kernel::actor::Role;
use kernel::id::UserId;
use kernel::validation::Email;

use crate::domain::entity::user::User;
use crate::domain::value_object::username::Username;
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user
    ///
    /// Fails with `EmailTaken` / `UsernameTaken` when a unique key collides.
    async fn create(&self, user: &User) -> AuthResult<()>;

    async fn find_by_id(&self, id: &UserId) -> AuthResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    async fn exists_by_username(&self, username: &Username) -> AuthResult<bool>;

    /// Whether any account holds `role`
    async fn exists_with_role(&self, role: Role) -> AuthResult<bool>;

    /// Stamp a successful sign-in
    async fn record_login(&self, id: &UserId, at: DateTime<Utc>) -> AuthResult<()>;
}
