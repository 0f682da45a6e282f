//! Contact Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Contact entity, lifecycle changes, query types, repository trait
//! - `application/` - Use cases
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Lifecycle
//! - Visitors submit messages publicly; new contacts start as `PENDING`
//! - Admins read, reply, change status, soft delete and restore
//! - `REMOVED` status and the soft-delete flag always move together
//! - Only a superadmin may delete permanently

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::ContactConfig;
pub use error::{ContactError, ContactResult};
pub use infra::memory::InMemoryContactRepository;
pub use infra::postgres::PgContactRepository;
pub use presentation::router::{contact_router, contact_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::PgContactRepository as ContactStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}
