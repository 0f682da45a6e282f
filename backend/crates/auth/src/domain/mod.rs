//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::claims::Claims;
pub use entity::user::{NewUser, User};
pub use repository::UserRepository;
