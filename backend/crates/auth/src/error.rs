//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::PasswordPolicyError;
use thiserror::Error;

use crate::domain::entity::user::AccountBlock;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User not found")]
    UserNotFound,

    #[error("Email already in use")]
    EmailTaken,

    #[error("Username already in use")]
    UsernameTaken,

    /// Unknown email or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{}", .0.message())]
    AccountBlocked(AccountBlock),

    /// Self-registration asked for a privileged role
    #[error("Role cannot be self-assigned")]
    RoleNotAllowed,

    /// Bad signature, wrong secret or expired
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Refresh token missing")]
    MissingRefreshToken,

    #[error("{0}")]
    PasswordPolicy(#[from] PasswordPolicyError),

    #[error(transparent)]
    App(#[from] AppError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::EmailTaken | AuthError::PasswordPolicy(_) => ErrorKind::BadRequest,
            AuthError::UsernameTaken => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::MissingRefreshToken => ErrorKind::Unauthorized,
            AuthError::AccountBlocked(_) | AuthError::RoleNotAllowed => ErrorKind::Forbidden,
            AuthError::App(err) => err.kind(),
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn into_app_error(self) -> AppError {
        match self {
            AuthError::App(err) => err,
            AuthError::EmailTaken => {
                AppError::bad_request("Email already in use").with_field("email", "Email already in use")
            }
            AuthError::UsernameTaken => AppError::conflict("Username already in use")
                .with_field("username", "Username already in use"),
            AuthError::PasswordPolicy(err) => {
                let message = err.to_string();
                AppError::bad_request(message.clone()).with_field("password", message)
            }
            AuthError::InvalidToken => AppError::unauthorized("Invalid or expired token")
                .with_action("Sign in again to obtain a new token"),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::AccountBlocked(block) => {
                tracing::warn!(reason = ?block, "Login attempt on blocked account");
            }
            AuthError::App(err) if err.is_server_error() => {
                tracing::error!(error = %err, "Auth request failed");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::EmailTaken.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::UsernameTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::AccountBlocked(AccountBlock::Deleted).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AuthError::RoleNotAllowed.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AuthError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_messages() {
        assert_eq!(AuthError::EmailTaken.into_app_error().message(), "Email already in use");
        assert_eq!(
            AuthError::AccountBlocked(AccountBlock::Deactivated).to_string(),
            "This account has been deactivated"
        );

        let app = AuthError::from(PasswordPolicyError::TooShort { min: 6, actual: 3 })
            .into_app_error();
        assert_eq!(app.status_code(), 400);
        assert_eq!(app.details()[0].field, "password");
    }
}
