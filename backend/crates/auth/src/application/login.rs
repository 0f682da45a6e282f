//! Login Use Case
//!
//! Authenticates a user by email and password.

use std::sync::Arc;

use chrono::Utc;
use kernel::validation::Email;
use platform::password::{ClearTextPassword, verify_without_account};

use crate::application::config::AuthConfig;
use crate::application::register::AuthSession;
use crate::application::token::TokenCodec;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub email: Email,
    pub password: String,
}

/// Login use case
pub struct LoginUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
    tokens: TokenCodec,
}

impl<R> LoginUseCase<R>
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

    pub async fn execute(&self, input: LoginInput) -> AuthResult<AuthSession> {
        // A password that fails the policy can never match a stored hash
        let password =
            ClearTextPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        // Unknown emails pay the same hashing cost as known ones
        let Some(mut user) = self.repo.find_by_email(&input.email).await? else {
            verify_without_account(&password, self.config.pepper());
            return Err(AuthError::InvalidCredentials);
        };
        if !user.password_hash.verify(&password, self.config.pepper()) {
            return Err(AuthError::InvalidCredentials);
        }

        user.check_can_login().map_err(AuthError::AccountBlocked)?;

        user.record_login();
        self.repo
            .record_login(&user.id, user.last_login.unwrap_or_else(Utc::now))
            .await?;

        let tokens = self.tokens.issue_pair(&user)?;

        tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok(AuthSession { user, tokens })
    }
}
