//! Contact Router

use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use std::sync::Arc;

use crate::application::config::ContactConfig;
use crate::domain::repository::ContactRepository;
use crate::infra::postgres::PgContactRepository;
use crate::presentation::handlers::{self, ContactAppState};

/// Create the Contact router with PostgreSQL repository
pub fn contact_router(repo: PgContactRepository, config: ContactConfig) -> Router {
    contact_router_generic(repo, config)
}

/// Create a generic Contact router for any repository implementation
///
/// Routes other than `POST /` expect an `Actor` in the request
/// extensions, inserted by the auth middleware.
pub fn contact_router_generic<R>(repo: R, config: ContactConfig) -> Router
where
    R: ContactRepository + Clone + Send + Sync + 'static,
{
    let state = ContactAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        .route(
            "/",
            post(handlers::submit_contact::<R>).get(handlers::list_contacts::<R>),
        )
        .route("/statistics", get(handlers::statistics::<R>))
        .route("/bulk/status", post(handlers::bulk_update_status::<R>))
        .route("/{id}", get(handlers::get_contact::<R>))
        .route("/{id}/status", patch(handlers::update_status::<R>))
        .route("/{id}/reply", post(handlers::reply::<R>))
        .route("/{id}/soft", delete(handlers::soft_delete::<R>))
        .route("/{id}/restore", post(handlers::restore::<R>))
        .route("/{id}/permanent", delete(handlers::permanent_delete::<R>))
        .with_state(state)
}
