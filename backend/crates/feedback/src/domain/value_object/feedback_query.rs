//! List query: filters and page

use kernel::pagination::PageRequest;
use std::cmp::Ordering;

use crate::domain::entity::feedback::Feedback;
use crate::domain::value_object::{
    classification::{FeedbackCategory, FeedbackPriority},
    feedback_status::FeedbackStatus,
};

/// Filters for the feedback list
///
/// Present filters combine with AND; `search` matches title or message,
/// case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackFilter {
    pub status: Option<FeedbackStatus>,
    pub category: Option<FeedbackCategory>,
    pub priority: Option<FeedbackPriority>,
    pub search: Option<String>,
}

impl FeedbackFilter {
    pub fn matches(&self, feedback: &Feedback) -> bool {
        if self.status.is_some_and(|s| s != feedback.status) {
            return false;
        }
        if self.category.is_some_and(|c| c != feedback.category) {
            return false;
        }
        if self.priority.is_some_and(|p| Some(p) != feedback.priority) {
            return false;
        }
        match &self.search {
            Some(term) => {
                let needle = term.to_lowercase();
                feedback.title.to_lowercase().contains(&needle)
                    || feedback.message.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }
}

/// Newest first, ties broken by id
pub fn newest_first(a: &Feedback, b: &Feedback) -> Ordering {
    b.submitted_at
        .cmp(&a.submitted_at)
        .then_with(|| b.id.cmp(&a.id))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackQuery {
    pub filter: FeedbackFilter,
    pub page: PageRequest,
}
