//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod query_feedback;
pub mod review_feedback;
pub mod submit_feedback;

// Re-exports
pub use config::FeedbackConfig;
pub use query_feedback::{FeedbackListOutput, GetFeedbackUseCase, ListFeedbackUseCase};
pub use review_feedback::ReviewFeedbackUseCase;
pub use submit_feedback::SubmitFeedbackUseCase;
