//! Feedback Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type FeedbackResult<T> = Result<T, FeedbackError>;

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("Feedback not found")]
    NotFound,

    #[error("Nothing to update")]
    EmptyReview,

    /// `assignedTo` names a user that does not exist
    #[error("Assigned user not found")]
    AssigneeNotFound,

    #[error(transparent)]
    App(#[from] AppError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FeedbackError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FeedbackError::NotFound => ErrorKind::NotFound,
            FeedbackError::EmptyReview | FeedbackError::AssigneeNotFound => ErrorKind::BadRequest,
            FeedbackError::App(err) => err.kind(),
            FeedbackError::Database(_) | FeedbackError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn into_app_error(self) -> AppError {
        match self {
            FeedbackError::App(err) => err,
            FeedbackError::EmptyReview => AppError::bad_request("Nothing to update").with_action(
                "Send at least one of status, priority, adminNotes, tags, assignedTo",
            ),
            FeedbackError::AssigneeNotFound => AppError::bad_request("Assigned user not found")
                .with_field("assignedTo", "No user with this id"),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    fn log(&self) {
        match self {
            FeedbackError::Database(e) => {
                tracing::error!(error = %e, "Feedback database error");
            }
            FeedbackError::Internal(msg) => {
                tracing::error!(message = %msg, "Feedback internal error");
            }
            FeedbackError::App(err) if err.is_server_error() => {
                tracing::error!(error = %err, "Feedback request failed");
            }
            _ => {
                tracing::debug!(error = %self, "Feedback error");
            }
        }
    }
}

impl IntoResponse for FeedbackError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}
