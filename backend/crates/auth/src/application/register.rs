//! Register Use Case
//!
//! Creates a new user account and signs it in.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::token::{TokenCodec, TokenPair};
use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// Register input
#[derive(Debug)]
pub struct RegisterInput {
    pub user: NewUser,
    pub password: ClearTextPassword,
}

/// Signed-in account plus its tokens
#[derive(Debug)]
pub struct AuthSession {
    pub user: User,
    pub tokens: TokenPair,
}

/// Register use case
pub struct RegisterUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
    tokens: TokenCodec,
}

impl<R> RegisterUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>, tokens: TokenCodec) -> Self {
        Self {
            repo,
            config,
            tokens,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<AuthSession> {
        let RegisterInput { user, password } = input;

        if !user.role.is_self_assignable() {
            tracing::warn!(role = %user.role, "Registration requested a privileged role");
            return Err(AuthError::RoleNotAllowed);
        }

        if self.repo.exists_by_email(&user.email).await? {
            return Err(AuthError::EmailTaken);
        }
        if let Some(username) = &user.username {
            if self.repo.exists_by_username(username).await? {
                return Err(AuthError::UsernameTaken);
            }
        }

        let password_hash = password
            .hash(self.config.pepper())
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        let user = User::register(user, password_hash);

        self.repo.create(&user).await?;
        let tokens = self.tokens.issue_pair(&user)?;

        tracing::info!(
            user_id = %user.id,
            role = %user.role,
            "User registered"
        );

        Ok(AuthSession { user, tokens })
    }
}
