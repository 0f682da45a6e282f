//! Contact Error Types
//!
//! Contact-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type ContactResult<T> = Result<T, ContactError>;

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("Contact not found")]
    NotFound,

    /// Status and reply updates on a soft-deleted contact
    #[error("Contact has been removed; restore it first")]
    Removed,

    /// `REMOVED` is only reachable through soft delete
    #[error("Status REMOVED can only be set by deleting the contact")]
    RemovedViaStatus,

    #[error("Reply message is required")]
    EmptyReply,

    /// Validation, authorization and other errors already shaped for the client
    #[error(transparent)]
    App(#[from] AppError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ContactError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ContactError::NotFound => ErrorKind::NotFound,
            ContactError::Removed => ErrorKind::Conflict,
            ContactError::RemovedViaStatus | ContactError::EmptyReply => ErrorKind::BadRequest,
            ContactError::App(err) => err.kind(),
            ContactError::Database(_) | ContactError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    pub fn into_app_error(self) -> AppError {
        match self {
            ContactError::App(err) => err,
            ContactError::RemovedViaStatus => AppError::bad_request(
                "Status REMOVED can only be set by deleting the contact",
            )
            .with_field("status", "Use the soft delete endpoint to remove a contact"),
            ContactError::EmptyReply => AppError::bad_request("Reply message is required")
                .with_field("replyMessage", "Reply message is required"),
            ContactError::Removed => AppError::conflict("Contact has been removed")
                .with_action("Restore the contact before changing its status"),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    fn log(&self) {
        match self {
            ContactError::Database(e) => {
                tracing::error!(error = %e, "Contact database error");
            }
            ContactError::Internal(msg) => {
                tracing::error!(message = %msg, "Contact internal error");
            }
            ContactError::App(err) if err.is_server_error() => {
                tracing::error!(error = %err, "Contact request failed");
            }
            _ => {
                tracing::debug!(error = %self, "Contact error");
            }
        }
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}
