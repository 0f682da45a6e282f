//! In-memory Repository
//!
//! Enforces the same unique keys as the users table. Used by the test
//! suite.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::actor::Role;
use kernel::id::UserId;
use kernel::validation::Email;
use tokio::sync::RwLock;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::username::Username;
use crate::error::{AuthError, AuthResult};

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a stored user, e.g. to deactivate it
    pub async fn put(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AuthError::EmailTaken);
        }
        if user.username.is_some() && users.values().any(|u| u.username == user.username) {
            return Err(AuthError::UsernameTaken);
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        Ok(self.users.read().await.values().any(|u| &u.email == email))
    }

    async fn exists_by_username(&self, username: &Username) -> AuthResult<bool> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .any(|u| u.username.as_ref() == Some(username)))
    }

    async fn exists_with_role(&self, role: Role) -> AuthResult<bool> {
        Ok(self.users.read().await.values().any(|u| u.role == role))
    }

    async fn record_login(&self, id: &UserId, at: DateTime<Utc>) -> AuthResult<()> {
        if let Some(user) = self.users.write().await.get_mut(id) {
            user.last_login = Some(at);
            user.updated_at = at;
        }
        Ok(())
    }
}
