//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{ContactId, UserId};
use kernel::pagination::PageRequest;
use kernel::validation::Validator;
use serde::{Deserialize, Serialize};

use crate::domain::entity::{
    contact::{ActorSummary, ContactView, NewContact},
    statistics::ContactStatistics,
};
use crate::domain::value_object::{
    contact_query::{ContactFilter, ContactQuery, ContactSort, SortField, SortOrder},
    contact_status::ContactStatus,
};

// ============================================================================
// Requests
// ============================================================================

/// Request for POST /api/contacts
///
/// Every field defaults so that missing values surface as field errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub social_link: Option<String>,
}

impl SubmitContactRequest {
    pub fn validate(self) -> AppResult<NewContact> {
        let mut v = Validator::new();
        v.min_chars("name", "Name", &self.name, 2)
            .min_chars("message", "Message", &self.message, 10);

        let social_link = self
            .social_link
            .map(|link| link.trim().to_string())
            .filter(|link| !link.is_empty());
        v.optional_url("socialLink", social_link.as_deref());

        let email = v.email("email", &self.email);
        v.finish()?;
        let email = email.ok_or_else(|| AppError::bad_request("Invalid email format"))?;

        Ok(NewContact {
            name: self.name.trim().to_string(),
            email,
            message: self.message.trim().to_string(),
            social_link,
        })
    }
}

/// Query parameters for GET /api/contacts
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListContactsParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub is_deleted: Option<String>,
    pub search: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl ListContactsParams {
    pub fn into_query(self, max_limit: u32) -> AppResult<ContactQuery> {
        let page = PageRequest::new(self.page, self.limit, max_limit)?;

        let mut v = Validator::new();
        let status = non_blank(self.status).and_then(|s| v.parse::<ContactStatus>("status", &s));
        let is_deleted = non_blank(self.is_deleted).and_then(|raw| match raw.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => {
                v.push("isDeleted", "Must be true or false");
                None
            }
        });
        let created_from = non_blank(self.start_date).and_then(|raw| {
            parse_date_bound(&raw, DateBound::Start)
                .or_else(|| invalid_date(&mut v, "startDate"))
        });
        let created_to = non_blank(self.end_date).and_then(|raw| {
            parse_date_bound(&raw, DateBound::End).or_else(|| invalid_date(&mut v, "endDate"))
        });
        if let (Some(from), Some(to)) = (created_from, created_to) {
            v.check(from <= to, "endDate", "End date must not be before start date");
        }
        let field = non_blank(self.sort_by)
            .map(|s| v.parse::<SortField>("sortBy", &s))
            .unwrap_or(Some(SortField::default()));
        let order = non_blank(self.sort_order)
            .map(|s| v.parse::<SortOrder>("sortOrder", &s))
            .unwrap_or(Some(SortOrder::default()));
        v.finish()?;

        Ok(ContactQuery {
            filter: ContactFilter {
                status,
                is_deleted,
                search: non_blank(self.search),
                created_from,
                created_to,
            },
            sort: ContactSort {
                field: field.unwrap_or_default(),
                order: order.unwrap_or_default(),
            },
            page,
        })
    }
}

/// Request for PATCH /api/contacts/{id}/status
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Request for POST /api/contacts/{id}/reply
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest {
    #[serde(default)]
    pub reply_message: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Optional body for DELETE /api/contacts/{id}/soft
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftDeleteRequest {
    #[serde(default)]
    pub remove_reason: Option<String>,
}

/// Request for POST /api/contacts/bulk/status
#[derive(Debug, Clone, Deserialize)]
pub struct BulkStatusRequest {
    #[serde(default)]
    pub ids: Vec<String>,
    pub status: String,
}

impl BulkStatusRequest {
    pub fn validate(self) -> AppResult<(Vec<ContactId>, ContactStatus)> {
        let mut v = Validator::new();
        v.check(!self.ids.is_empty(), "ids", "At least one id is required");

        let mut ids = Vec::with_capacity(self.ids.len());
        for raw in &self.ids {
            match ContactId::parse_str(raw.trim()) {
                Ok(id) => ids.push(id),
                Err(_) => v.push("ids", format!("Invalid ID: {raw}")),
            }
        }
        let status = v.parse::<ContactStatus>("status", &self.status);
        v.finish()?;

        Ok((ids, status.unwrap_or_default()))
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Moderator reference; name and email are absent when the user is gone
#[derive(Debug, Clone, Serialize)]
pub struct ActorRef {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ActorRef {
    fn new(id: UserId, summary: Option<ActorSummary>) -> Self {
        match summary {
            Some(s) => Self {
                id: s.id.to_hex(),
                name: Some(s.name),
                email: Some(s.email),
            },
            None => Self {
                id: id.to_hex(),
                name: None,
                email: None,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_link: Option<String>,
    pub status: ContactStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replied_by: Option<ActorRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replied_at: Option<DateTime<Utc>>,
    pub is_deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed_by: Option<ActorRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ContactView> for ContactResponse {
    fn from(view: ContactView) -> Self {
        let ContactView {
            contact,
            replied_by,
            removed_by,
        } = view;
        let is_deleted = contact.is_deleted();

        let (reply_message, replied_ref, replied_at) = match contact.reply {
            Some(reply) => (
                Some(reply.message),
                Some(ActorRef::new(reply.replied_by, replied_by)),
                Some(reply.replied_at),
            ),
            None => (None, None, None),
        };
        let (removed_ref, remove_reason) = match contact.removal {
            Some(removal) => (
                Some(ActorRef::new(removal.removed_by, removed_by)),
                removal.reason,
            ),
            None => (None, None),
        };

        Self {
            id: contact.id.to_hex(),
            name: contact.name,
            email: contact.email.into_inner(),
            message: contact.message,
            social_link: contact.social_link,
            status: contact.status,
            reply_message,
            replied_by: replied_ref,
            replied_at,
            is_deleted,
            removed_by: removed_ref,
            remove_reason,
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateResponse {
    pub modified_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusCountResponse {
    pub status: ContactStatus,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentContactResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
}

/// Response for GET /api/contacts/statistics
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResponse {
    pub total_contacts: u64,
    pub by_status: Vec<StatusCountResponse>,
    pub recent_contacts: Vec<RecentContactResponse>,
    pub unread_count: u64,
}

impl From<ContactStatistics> for StatisticsResponse {
    fn from(stats: ContactStatistics) -> Self {
        Self {
            total_contacts: stats.total_contacts,
            by_status: stats
                .by_status
                .into_iter()
                .map(|g| StatusCountResponse {
                    status: g.status,
                    count: g.count,
                })
                .collect(),
            recent_contacts: stats
                .recent_contacts
                .into_iter()
                .map(|r| RecentContactResponse {
                    id: r.id.to_hex(),
                    name: r.name,
                    email: r.email.into_inner(),
                    status: r.status,
                    created_at: r.created_at,
                })
                .collect(),
            unread_count: stats.unread_count,
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

#[derive(Clone, Copy)]
enum DateBound {
    Start,
    End,
}

/// RFC 3339 timestamp, or a bare `YYYY-MM-DD` covering that whole UTC day
/// Date-only bounds cover the whole UTC day
///
/// An unencoded `+` offset arrives as a space after query decoding, so
/// `2024-03-01T00:00:00 02:00` is read as `+02:00`.
fn parse_date_bound(raw: &str, bound: DateBound) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Some((stamp, offset)) = raw.rsplit_once(' ') {
        let ts = DateTime::parse_from_rfc3339(&format!("{stamp}+{offset}")).ok()?;
        return Some(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let time = match bound {
        DateBound::Start => NaiveTime::MIN,
        DateBound::End => NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)?,
    };
    Some(date.and_time(time).and_utc())
}

fn invalid_date(v: &mut Validator, field: &'static str) -> Option<DateTime<Utc>> {
    v.push(field, "Must be a date (YYYY-MM-DD) or an RFC 3339 timestamp");
    None
}
