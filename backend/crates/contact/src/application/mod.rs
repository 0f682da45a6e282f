//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod contact_statistics;
pub mod moderate_contact;
pub mod query_contacts;
pub mod submit_contact;

// Re-exports
pub use config::ContactConfig;
pub use contact_statistics::ContactStatisticsUseCase;
pub use moderate_contact::ModerateContactUseCase;
pub use query_contacts::{ContactListOutput, GetContactUseCase, ListContactsUseCase};
pub use submit_contact::SubmitContactUseCase;
