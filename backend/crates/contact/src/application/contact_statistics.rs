//! Contact Statistics Use Case

use crate::application::config::ContactConfig;
use crate::domain::entity::statistics::ContactStatistics;
use crate::domain::repository::ContactRepository;
use crate::error::ContactResult;
use std::sync::Arc;

pub struct ContactStatisticsUseCase<R>
where
    R: ContactRepository,
{
    repo: Arc<R>,
    config: Arc<ContactConfig>,
}

impl<R> ContactStatisticsUseCase<R>
where
    R: ContactRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<ContactConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self) -> ContactResult<ContactStatistics> {
        self.repo.statistics(self.config.recent_limit).await
    }
}
