//! Seed Super Admin Use Case
//!
//! Creates the bootstrap superadmin on startup when none exists.

use std::sync::Arc;

use kernel::actor::Role;
use kernel::validation::Email;
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::{NewUser, User, UserProfile};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::username::Username;
use crate::error::{AuthError, AuthResult};

pub struct SeedSuperAdminUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> SeedSuperAdminUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// `Some(user)` when an account was created
    pub async fn execute(&self) -> AuthResult<Option<User>> {
        let Some(seed) = &self.config.super_admin else {
            tracing::debug!("No superadmin credentials configured; skipping seed");
            return Ok(None);
        };

        if self.repo.exists_with_role(Role::SuperAdmin).await? {
            tracing::debug!("Superadmin already exists");
            return Ok(None);
        }

        let email = Email::new(&seed.email)?;
        let password_hash = ClearTextPassword::new(seed.password.clone())?
            .hash(self.config.pepper())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let mut user = User::register(
            NewUser {
                full_name: "Super Admin".to_string(),
                email,
                username: Some(Username::system("superadmin")),
                role: Role::SuperAdmin,
                profession: None,
                profile: UserProfile {
                    location: Some("Headquarters".to_string()),
                    ..Default::default()
                },
            },
            password_hash,
        );
        user.is_email_verified = true;

        self.repo.create(&user).await?;

        tracing::info!(user_id = %user.id, email = %user.email, "Superadmin seeded");

        Ok(Some(user))
    }
}
