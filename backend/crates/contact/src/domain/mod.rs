//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::contact::{Contact, ContactChange, ContactView, NewContact};
pub use entity::statistics::ContactStatistics;
pub use repository::ContactRepository;
