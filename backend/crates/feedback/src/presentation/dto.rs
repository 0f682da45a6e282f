//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::UserId;
use kernel::pagination::PageRequest;
use kernel::validation::Validator;
use platform::client::ClientInfo;
use serde::{Deserialize, Serialize};

use crate::domain::entity::feedback::{Feedback, FeedbackReview, NewFeedback};
use crate::domain::value_object::{
    classification::{FeedbackCategory, FeedbackPriority, FeedbackSource},
    feedback_query::{FeedbackFilter, FeedbackQuery},
    feedback_status::FeedbackStatus,
};
use crate::error::FeedbackResult;

const TITLE_MAX_LENGTH: usize = 200;
const MESSAGE_MIN_LENGTH: usize = 10;
const TAG_MAX_LENGTH: usize = 50;

// ============================================================================
// Requests
// ============================================================================

/// Request for POST /api/feedback
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitFeedbackRequest {
    pub category: String,
    pub title: String,
    pub message: String,
    pub rating: Option<i64>,
    pub tags: Vec<String>,
    pub page_url: Option<String>,
    pub browser_info: Option<String>,
    pub source: Option<String>,
}

impl SubmitFeedbackRequest {
    /// Validate the payload; browser and address default to what the
    /// request itself reveals
    pub fn validate(self, client: &ClientInfo, max_tags: usize) -> AppResult<NewFeedback> {
        let mut v = Validator::new();
        let category = v.parse::<FeedbackCategory>("category", &self.category);

        let title = self.title.trim();
        v.check(!title.is_empty(), "title", "Title is required")
            .max_chars("title", "Title", title, TITLE_MAX_LENGTH)
            .min_chars("message", "Message", &self.message, MESSAGE_MIN_LENGTH);

        let rating = self.rating.and_then(|r| match u8::try_from(r) {
            Ok(r @ 1..=5) => Some(r),
            _ => {
                v.push("rating", "Rating must be between 1 and 5");
                None
            }
        });

        let page_url = non_blank(self.page_url);
        v.optional_url("pageUrl", page_url.as_deref());

        let source = match non_blank(self.source) {
            Some(raw) => v.parse::<FeedbackSource>("source", &raw),
            None => Some(FeedbackSource::default()),
        };
        let tags = normalize_tags(self.tags, max_tags, &mut v);
        v.finish()?;

        let (Some(category), Some(source)) = (category, source) else {
            return Err(AppError::bad_request("Validation failed"));
        };

        Ok(NewFeedback {
            category,
            title: title.to_string(),
            message: self.message.trim().to_string(),
            rating,
            tags,
            page_url,
            browser_info: non_blank(self.browser_info).or_else(|| client.user_agent.clone()),
            ip_address: client.ip_string(),
            source,
        })
    }
}

/// Query parameters for GET /api/feedback
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListFeedbackParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub search: Option<String>,
}

impl ListFeedbackParams {
    pub fn into_query(self, max_limit: u32) -> AppResult<FeedbackQuery> {
        let page = PageRequest::new(self.page, self.limit, max_limit)?;

        let mut v = Validator::new();
        let status = non_blank(self.status).and_then(|s| v.parse::<FeedbackStatus>("status", &s));
        let category =
            non_blank(self.category).and_then(|c| v.parse::<FeedbackCategory>("category", &c));
        let priority =
            non_blank(self.priority).and_then(|p| v.parse::<FeedbackPriority>("priority", &p));
        v.finish()?;

        Ok(FeedbackQuery {
            filter: FeedbackFilter {
                status,
                category,
                priority,
                search: non_blank(self.search),
            },
            page,
        })
    }
}

/// Request for PATCH /api/feedback/{id}
///
/// Absent fields are left alone. A blank `adminNotes` or `assignedTo`
/// clears the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewFeedbackRequest {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub admin_notes: Option<String>,
    pub tags: Option<Vec<String>>,
    pub assigned_to: Option<String>,
}

impl ReviewFeedbackRequest {
    pub fn validate(self, max_tags: usize) -> FeedbackResult<FeedbackReview> {
        let mut v = Validator::new();
        let status = self
            .status
            .and_then(|s| v.parse::<FeedbackStatus>("status", &s));
        let priority = self
            .priority
            .and_then(|p| v.parse::<FeedbackPriority>("priority", &p));
        let admin_notes = self.admin_notes.map(|notes| non_blank(Some(notes)));
        let tags = self.tags.map(|tags| normalize_tags(tags, max_tags, &mut v));
        let assigned_to = self.assigned_to.map(|raw| match non_blank(Some(raw)) {
            Some(raw) => match UserId::parse_str(&raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    v.push("assignedTo", format!("Invalid ID: {raw}"));
                    None
                }
            },
            None => None,
        });
        v.finish()?;

        FeedbackReview::new(status, priority, admin_notes, tags, assigned_to)
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub id: String,
    pub category: FeedbackCategory,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    pub status: FeedbackStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<FeedbackPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    pub source: FeedbackSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<Feedback> for FeedbackResponse {
    fn from(f: Feedback) -> Self {
        Self {
            id: f.id.to_hex(),
            category: f.category,
            title: f.title,
            message: f.message,
            rating: f.rating,
            status: f.status,
            priority: f.priority,
            admin_notes: f.admin_notes,
            submitted_at: f.submitted_at,
            reviewed_at: f.reviewed_at,
            resolved_at: f.resolved_at,
            tags: f.tags,
            page_url: f.page_url,
            browser_info: f.browser_info,
            ip_address: f.ip_address,
            source: f.source,
            assigned_to: f.assigned_to.map(|u| u.to_hex()),
            updated_at: f.updated_at,
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trimmed, lowercased, blank and duplicate tags dropped
fn normalize_tags(raw: Vec<String>, max_tags: usize, v: &mut Validator) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(raw.len());
    for tag in raw {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() || tags.contains(&tag) {
            continue;
        }
        if tag.chars().count() > TAG_MAX_LENGTH {
            v.push("tags", format!("Tags must not exceed {TAG_MAX_LENGTH} characters"));
            continue;
        }
        tags.push(tag);
    }
    v.check(
        tags.len() <= max_tags,
        "tags",
        format!("At most {max_tags} tags are allowed"),
    );
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeedbackError;

    fn submit(json: serde_json::Value, client: &ClientInfo) -> AppResult<NewFeedback> {
        serde_json::from_value::<SubmitFeedbackRequest>(json)
            .unwrap()
            .validate(client, 20)
    }

    #[test]
    fn test_submit_defaults_from_client() {
        let client = ClientInfo {
            ip: Some("203.0.113.7".parse().unwrap()),
            user_agent: Some("Mozilla/5.0".to_string()),
        };
        let new = submit(
            serde_json::json!({
                "category": "bug",
                "title": " Broken link ",
                "message": "The footer link to the blog is broken",
                "tags": ["Footer", "footer", " "]
            }),
            &client,
        )
        .unwrap();

        assert_eq!(new.title, "Broken link");
        assert_eq!(new.source, FeedbackSource::Web);
        assert_eq!(new.tags, vec!["footer"]);
        assert_eq!(new.browser_info.as_deref(), Some("Mozilla/5.0"));
        assert_eq!(new.ip_address.as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn test_submit_prefers_supplied_browser_info() {
        let client = ClientInfo {
            ip: None,
            user_agent: Some("curl/8".to_string()),
        };
        let new = submit(
            serde_json::json!({
                "category": "ui_ux",
                "title": "Dark mode",
                "message": "Please add a dark mode toggle",
                "browserInfo": "Safari 17",
                "source": "mobile",
                "rating": 5
            }),
            &client,
        )
        .unwrap();

        assert_eq!(new.browser_info.as_deref(), Some("Safari 17"));
        assert_eq!(new.source, FeedbackSource::Mobile);
        assert_eq!(new.rating, Some(5));
        assert!(new.ip_address.is_none());
    }

    #[test]
    fn test_submit_reports_every_field() {
        let err = submit(
            serde_json::json!({
                "category": "praise",
                "title": "",
                "message": "short",
                "rating": 6,
                "pageUrl": "not a url",
                "source": "fax"
            }),
            &ClientInfo::default(),
        )
        .unwrap_err();

        let fields: Vec<&str> = err.details().iter().map(|d| &*d.field).collect();
        assert_eq!(
            fields,
            vec!["category", "title", "message", "rating", "pageUrl", "source"]
        );
    }

    #[test]
    fn test_list_params() {
        let query = ListFeedbackParams {
            status: Some("resolved".into()),
            priority: Some("high".into()),
            search: Some("  ".into()),
            ..Default::default()
        }
        .into_query(100)
        .unwrap();

        assert_eq!(query.filter.status, Some(FeedbackStatus::Resolved));
        assert_eq!(query.filter.priority, Some(FeedbackPriority::High));
        assert!(query.filter.search.is_none());

        let err = ListFeedbackParams {
            category: Some("praise".into()),
            ..Default::default()
        }
        .into_query(100)
        .unwrap_err();
        assert_eq!(err.details()[0].field, "category");
    }

    #[test]
    fn test_review_blank_values_clear() {
        let review = ReviewFeedbackRequest {
            admin_notes: Some("  ".into()),
            assigned_to: Some(String::new()),
            ..Default::default()
        }
        .validate(20)
        .unwrap();

        assert_eq!(review.admin_notes, Some(None));
        assert_eq!(review.assigned_to, Some(None));
        assert!(review.status.is_none());
    }

    #[test]
    fn test_review_errors() {
        assert!(matches!(
            ReviewFeedbackRequest::default().validate(20),
            Err(FeedbackError::EmptyReview)
        ));

        let err = ReviewFeedbackRequest {
            status: Some("closed".into()),
            assigned_to: Some("nope".into()),
            ..Default::default()
        }
        .validate(20)
        .unwrap_err()
        .into_app_error();
        let fields: Vec<&str> = err.details().iter().map(|d| &*d.field).collect();
        assert_eq!(fields, vec!["status", "assignedTo"]);
    }
}
