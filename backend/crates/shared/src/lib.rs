//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of domain vocabulary:
//! - Common error types and result aliases
//! - Typed identifiers (`UserId`, `ContactId`, `FeedbackId`)
//! - The authenticated [`actor::Actor`] and its [`actor::Role`]
//! - Pagination and the success envelope shared by all list/detail endpoints
//! - Cross-cutting validation rules
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod actor;
#[cfg(feature = "axum")]
pub mod extract;
pub mod id;
pub mod pagination;
pub mod response;
pub mod validation;
