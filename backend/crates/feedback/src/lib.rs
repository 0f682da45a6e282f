//! Feedback Backend Module
//!
//! Anonymous product feedback and its staff review:
//! - `domain/` - Feedback entity, review rules, classification, repository trait
//! - `application/` - Use cases
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! Anyone may submit; admins list, read and review; only a superadmin deletes.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::FeedbackConfig;
pub use error::{FeedbackError, FeedbackResult};
pub use infra::memory::InMemoryFeedbackRepository;
pub use infra::postgres::PgFeedbackRepository;
pub use presentation::router::{feedback_router, feedback_router_generic};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod store {
    pub use crate::infra::postgres::PgFeedbackRepository as FeedbackStore;
}

#[cfg(test)]
mod tests;
