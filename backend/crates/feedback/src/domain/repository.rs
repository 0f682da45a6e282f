//! Repository Traits

use kernel::id::FeedbackId;
use kernel::pagination::Page;

use crate::domain::entity::feedback::{Feedback, FeedbackReview};
use crate::domain::value_object::feedback_query::FeedbackQuery;
use crate::error::FeedbackResult;

/// Feedback repository trait
#[trait_variant::make(FeedbackRepository: Send)]
pub trait LocalFeedbackRepository {
    async fn create(&self, feedback: &Feedback) -> FeedbackResult<()>;

    /// Newest-first page plus the total match count
    async fn find_page(&self, query: &FeedbackQuery) -> FeedbackResult<Page<Feedback>>;

    async fn find_by_id(&self, id: &FeedbackId) -> FeedbackResult<Option<Feedback>>;

    /// Apply a review atomically and return the updated entry
    async fn apply_review(
        &self,
        id: &FeedbackId,
        review: &FeedbackReview,
    ) -> FeedbackResult<Feedback>;

    /// Returns whether a row existed
    async fn delete(&self, id: &FeedbackId) -> FeedbackResult<bool>;
}
