//! Submit Feedback Use Case

use std::sync::Arc;

use crate::domain::entity::feedback::{Feedback, NewFeedback};
use crate::domain::repository::FeedbackRepository;
use crate::error::FeedbackResult;

/// Public feedback submission
pub struct SubmitFeedbackUseCase<R>
where
    R: FeedbackRepository,
{
    repo: Arc<R>,
}

impl<R> SubmitFeedbackUseCase<R>
where
    R: FeedbackRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: NewFeedback) -> FeedbackResult<Feedback> {
        let feedback = Feedback::submit(input);
        self.repo.create(&feedback).await?;

        tracing::info!(
            feedback_id = %feedback.id,
            category = %feedback.category,
            source = %feedback.source,
            "Feedback submitted"
        );

        Ok(feedback)
    }
}
