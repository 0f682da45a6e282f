//! Feedback Entity
//!
//! Feedback is submitted anonymously and later reviewed by staff. Review
//! timestamps follow the status:
//! - `reviewed_at` is stamped the first time the status leaves `pending`
//!   and is never cleared afterwards
//! - `resolved_at` is present exactly while the status is `resolved`

use chrono::{DateTime, Utc};
use kernel::id::{FeedbackId, UserId};

use crate::domain::value_object::{
    classification::{FeedbackCategory, FeedbackPriority, FeedbackSource},
    feedback_status::FeedbackStatus,
};
use crate::error::{FeedbackError, FeedbackResult};

/// Validated submission payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub category: FeedbackCategory,
    pub title: String,
    pub message: String,
    pub rating: Option<u8>,
    pub tags: Vec<String>,
    pub page_url: Option<String>,
    pub browser_info: Option<String>,
    pub ip_address: Option<String>,
    pub source: FeedbackSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub id: FeedbackId,
    pub category: FeedbackCategory,
    pub title: String,
    pub message: String,
    pub rating: Option<u8>,
    pub status: FeedbackStatus,
    pub priority: Option<FeedbackPriority>,
    pub admin_notes: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub page_url: Option<String>,
    pub browser_info: Option<String>,
    pub ip_address: Option<String>,
    pub source: FeedbackSource,
    pub assigned_to: Option<UserId>,
    pub updated_at: DateTime<Utc>,
}

impl Feedback {
    pub fn submit(new: NewFeedback) -> Self {
        let now = Utc::now();
        Self {
            id: FeedbackId::new(),
            category: new.category,
            title: new.title,
            message: new.message,
            rating: new.rating,
            status: FeedbackStatus::Pending,
            priority: None,
            admin_notes: None,
            submitted_at: now,
            reviewed_at: None,
            resolved_at: None,
            tags: new.tags,
            page_url: new.page_url,
            browser_info: new.browser_info,
            ip_address: new.ip_address,
            source: new.source,
            assigned_to: None,
            updated_at: now,
        }
    }

    /// Apply a staff review in place
    pub fn apply(&mut self, review: &FeedbackReview) {
        if let Some(status) = review.status {
            self.status = status;
        }
        if let Some(priority) = review.priority {
            self.priority = Some(priority);
        }
        if let Some(notes) = &review.admin_notes {
            self.admin_notes = notes.clone();
        }
        if let Some(tags) = &review.tags {
            self.tags = tags.clone();
        }
        if let Some(assigned_to) = review.assigned_to {
            self.assigned_to = assigned_to;
        }

        if !self.status.is_pending() && self.reviewed_at.is_none() {
            self.reviewed_at = Some(review.at);
        }
        self.resolved_at = if self.status.is_resolved() {
            self.resolved_at.or(Some(review.at))
        } else {
            None
        };
        self.updated_at = review.at;
    }
}

/// A partial update from staff
///
/// `None` leaves a field untouched. For the clearable fields the inner
/// `None` clears the stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackReview {
    pub status: Option<FeedbackStatus>,
    pub priority: Option<FeedbackPriority>,
    pub admin_notes: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub assigned_to: Option<Option<UserId>>,
    pub at: DateTime<Utc>,
}

impl FeedbackReview {
    pub fn new(
        status: Option<FeedbackStatus>,
        priority: Option<FeedbackPriority>,
        admin_notes: Option<Option<String>>,
        tags: Option<Vec<String>>,
        assigned_to: Option<Option<UserId>>,
    ) -> FeedbackResult<Self> {
        if status.is_none()
            && priority.is_none()
            && admin_notes.is_none()
            && tags.is_none()
            && assigned_to.is_none()
        {
            return Err(FeedbackError::EmptyReview);
        }
        Ok(Self {
            status,
            priority,
            admin_notes,
            tags,
            assigned_to,
            at: Utc::now(),
        })
    }

    /// Status-only review
    pub fn status(status: FeedbackStatus) -> Self {
        Self {
            status: Some(status),
            priority: None,
            admin_notes: None,
            tags: None,
            assigned_to: None,
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn feedback() -> Feedback {
        Feedback::submit(NewFeedback {
            category: FeedbackCategory::Bug,
            title: "Broken link".to_string(),
            message: "The footer link to the blog is broken".to_string(),
            rating: Some(3),
            tags: vec!["footer".to_string()],
            page_url: None,
            browser_info: None,
            ip_address: None,
            source: FeedbackSource::Web,
        })
    }

    fn at(review: FeedbackReview, offset_secs: i64) -> FeedbackReview {
        FeedbackReview {
            at: review.at + Duration::seconds(offset_secs),
            ..review
        }
    }

    #[test]
    fn test_submit_starts_pending() {
        let f = feedback();
        assert_eq!(f.status, FeedbackStatus::Pending);
        assert!(f.reviewed_at.is_none());
        assert!(f.resolved_at.is_none());
        assert_eq!(f.submitted_at, f.updated_at);
    }

    #[test]
    fn test_first_review_stamps_reviewed_at_once() {
        let mut f = feedback();
        let first = FeedbackReview::status(FeedbackStatus::Reviewed);
        let first_at = first.at;
        f.apply(&first);
        assert_eq!(f.reviewed_at, Some(first_at));

        f.apply(&at(FeedbackReview::status(FeedbackStatus::Dismissed), 60));
        assert_eq!(f.reviewed_at, Some(first_at));
    }

    #[test]
    fn test_resolve_then_reopen() {
        let mut f = feedback();
        let resolve = FeedbackReview::status(FeedbackStatus::Resolved);
        let resolved_at = resolve.at;
        f.apply(&resolve);
        assert_eq!(f.resolved_at, Some(resolved_at));
        assert_eq!(f.reviewed_at, Some(resolved_at));

        // Touching other fields keeps the original resolution time
        let notes = FeedbackReview::new(None, None, Some(Some("fixed".into())), None, None).unwrap();
        f.apply(&at(notes, 30));
        assert_eq!(f.resolved_at, Some(resolved_at));

        f.apply(&at(FeedbackReview::status(FeedbackStatus::Reviewed), 60));
        assert!(f.resolved_at.is_none());
        assert!(f.reviewed_at.is_some());
    }

    #[test]
    fn test_non_status_review_keeps_pending() {
        let mut f = feedback();
        let review = FeedbackReview::new(
            None,
            Some(FeedbackPriority::High),
            None,
            Some(vec!["urgent".into()]),
            None,
        )
        .unwrap();
        f.apply(&review);

        assert_eq!(f.status, FeedbackStatus::Pending);
        assert_eq!(f.priority, Some(FeedbackPriority::High));
        assert_eq!(f.tags, vec!["urgent"]);
        assert!(f.reviewed_at.is_none());
    }

    #[test]
    fn test_clearable_fields() {
        let mut f = feedback();
        let assignee = UserId::new();
        f.apply(
            &FeedbackReview::new(None, None, Some(Some("note".into())), None, Some(Some(assignee)))
                .unwrap(),
        );
        assert_eq!(f.assigned_to, Some(assignee));
        assert_eq!(f.admin_notes.as_deref(), Some("note"));

        f.apply(&FeedbackReview::new(None, None, Some(None), None, Some(None)).unwrap());
        assert!(f.assigned_to.is_none());
        assert!(f.admin_notes.is_none());
    }

    #[test]
    fn test_empty_review_rejected() {
        assert!(matches!(
            FeedbackReview::new(None, None, None, None, None),
            Err(FeedbackError::EmptyReview)
        ));
    }
}
