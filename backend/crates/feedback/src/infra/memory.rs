//! In-memory Repository
//!
//! Map-backed repository for tests and database-free runs. Assignees are
//! not checked against a user table.

use std::collections::HashMap;
use std::sync::Arc;

use kernel::id::FeedbackId;
use kernel::pagination::Page;
use tokio::sync::RwLock;

use crate::domain::entity::feedback::{Feedback, FeedbackReview};
use crate::domain::repository::FeedbackRepository;
use crate::domain::value_object::feedback_query::{FeedbackQuery, newest_first};
use crate::error::{FeedbackError, FeedbackResult};

#[derive(Clone, Default)]
pub struct InMemoryFeedbackRepository {
    feedback: Arc<RwLock<HashMap<FeedbackId, Feedback>>>,
}

impl InMemoryFeedbackRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an entry as-is, bypassing submission
    pub async fn insert(&self, feedback: Feedback) {
        self.feedback.write().await.insert(feedback.id, feedback);
    }
}

impl FeedbackRepository for InMemoryFeedbackRepository {
    async fn create(&self, feedback: &Feedback) -> FeedbackResult<()> {
        let mut entries = self.feedback.write().await;
        if entries.contains_key(&feedback.id) {
            return Err(FeedbackError::Internal(format!(
                "Duplicate feedback id {}",
                feedback.id
            )));
        }
        entries.insert(feedback.id, feedback.clone());
        Ok(())
    }

    async fn find_page(&self, query: &FeedbackQuery) -> FeedbackResult<Page<Feedback>> {
        let entries = self.feedback.read().await;
        let mut matched: Vec<&Feedback> = entries
            .values()
            .filter(|f| query.filter.matches(f))
            .collect();
        matched.sort_by(|a, b| newest_first(a, b));

        let total = matched.len() as u64;
        let offset = usize::try_from(query.page.offset()).unwrap_or(usize::MAX);
        let items = matched
            .into_iter()
            .skip(offset)
            .take(query.page.limit() as usize)
            .cloned()
            .collect();

        Ok(Page::new(items, total))
    }

    async fn find_by_id(&self, id: &FeedbackId) -> FeedbackResult<Option<Feedback>> {
        Ok(self.feedback.read().await.get(id).cloned())
    }

    async fn apply_review(
        &self,
        id: &FeedbackId,
        review: &FeedbackReview,
    ) -> FeedbackResult<Feedback> {
        let mut entries = self.feedback.write().await;
        let feedback = entries.get_mut(id).ok_or(FeedbackError::NotFound)?;
        feedback.apply(review);
        Ok(feedback.clone())
    }

    async fn delete(&self, id: &FeedbackId) -> FeedbackResult<bool> {
        Ok(self.feedback.write().await.remove(id).is_some())
    }
}
