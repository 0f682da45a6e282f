//! Review Feedback Use Case
//!
//! Staff updates and deletion. Role checks happen in the handlers.

use kernel::id::{FeedbackId, UserId};
use std::sync::Arc;

use crate::domain::entity::feedback::{Feedback, FeedbackReview};
use crate::domain::repository::FeedbackRepository;
use crate::error::{FeedbackError, FeedbackResult};

pub struct ReviewFeedbackUseCase<R>
where
    R: FeedbackRepository,
{
    repo: Arc<R>,
}

impl<R> ReviewFeedbackUseCase<R>
where
    R: FeedbackRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn review(
        &self,
        id: &FeedbackId,
        review: FeedbackReview,
        actor: UserId,
    ) -> FeedbackResult<Feedback> {
        let feedback = self.repo.apply_review(id, &review).await?;

        tracing::info!(
            feedback_id = %id,
            actor_id = %actor,
            status = %feedback.status,
            "Feedback reviewed"
        );

        Ok(feedback)
    }

    pub async fn delete(&self, id: &FeedbackId, actor: UserId) -> FeedbackResult<()> {
        if !self.repo.delete(id).await? {
            return Err(FeedbackError::NotFound);
        }
        tracing::info!(feedback_id = %id, actor_id = %actor, "Feedback deleted");
        Ok(())
    }
}
