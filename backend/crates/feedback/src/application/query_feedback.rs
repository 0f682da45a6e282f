//! Feedback read use cases

use kernel::id::FeedbackId;
use kernel::pagination::{Page, PageMeta};
use std::sync::Arc;

use crate::domain::entity::feedback::Feedback;
use crate::domain::repository::FeedbackRepository;
use crate::domain::value_object::feedback_query::FeedbackQuery;
use crate::error::{FeedbackError, FeedbackResult};

#[derive(Debug, Clone)]
pub struct FeedbackListOutput {
    pub feedback: Vec<Feedback>,
    pub meta: PageMeta,
}

pub struct ListFeedbackUseCase<R>
where
    R: FeedbackRepository,
{
    repo: Arc<R>,
}

impl<R> ListFeedbackUseCase<R>
where
    R: FeedbackRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, query: FeedbackQuery) -> FeedbackResult<FeedbackListOutput> {
        let Page { items, total } = self.repo.find_page(&query).await?;

        Ok(FeedbackListOutput {
            feedback: items,
            meta: PageMeta::new(query.page, total),
        })
    }
}

pub struct GetFeedbackUseCase<R>
where
    R: FeedbackRepository,
{
    repo: Arc<R>,
}

impl<R> GetFeedbackUseCase<R>
where
    R: FeedbackRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: &FeedbackId) -> FeedbackResult<Feedback> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(FeedbackError::NotFound)
    }
}
