//! Feedback Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::FeedbackConfig;
use crate::domain::repository::FeedbackRepository;
use crate::infra::postgres::PgFeedbackRepository;
use crate::presentation::handlers::{self, FeedbackAppState};

/// Create the Feedback router with PostgreSQL repository
pub fn feedback_router(repo: PgFeedbackRepository, config: FeedbackConfig) -> Router {
    feedback_router_generic(repo, config)
}

/// Create a generic Feedback router for any repository implementation
pub fn feedback_router_generic<R>(repo: R, config: FeedbackConfig) -> Router
where
    R: FeedbackRepository + Clone + Send + Sync + 'static,
{
    let state = FeedbackAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        .route(
            "/",
            post(handlers::submit_feedback::<R>).get(handlers::list_feedback::<R>),
        )
        .route(
            "/{id}",
            get(handlers::get_feedback::<R>)
                .patch(handlers::review_feedback::<R>)
                .delete(handlers::delete_feedback::<R>),
        )
        .with_state(state)
}
