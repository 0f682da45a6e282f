//! Refresh Token Use Case
//!
//! Exchanges a refresh token for a new access token.

use std::sync::Arc;

use crate::application::token::TokenCodec;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

pub struct RefreshTokenUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    tokens: TokenCodec,
}

impl<R> RefreshTokenUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, tokens: TokenCodec) -> Self {
        Self { repo, tokens }
    }

    /// New access token for the account the refresh token names
    ///
    /// The account is reloaded so role changes and blocks take effect.
    pub async fn execute(&self, refresh_token: &str) -> AuthResult<String> {
        let claims = self.tokens.decode_refresh(refresh_token)?;

        let user = self
            .repo
            .find_by_id(&claims.sub)
            .await?
            .ok_or(AuthError::InvalidToken)?;
        user.check_can_login().map_err(AuthError::AccountBlocked)?;

        tracing::debug!(user_id = %user.id, "Access token refreshed");

        self.tokens.issue_access(&user)
    }
}
