//! List query: filters, sort and page

use chrono::{DateTime, Utc};
use kernel::error::app_error::AppError;
use kernel::pagination::PageRequest;
use std::cmp::Ordering;
use std::str::FromStr;

use crate::domain::entity::contact::Contact;
use crate::domain::value_object::contact_status::ContactStatus;

/// Filters for the contact list
///
/// All present filters combine with AND. `search` is a case-insensitive
/// substring match against name, email and message combined with OR.
/// `is_deleted` is only applied when given, so by default both live and
/// soft-deleted contacts are listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFilter {
    pub status: Option<ContactStatus>,
    pub is_deleted: Option<bool>,
    pub search: Option<String>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
}

impl ContactFilter {
    pub fn matches(&self, contact: &Contact) -> bool {
        if self.status.is_some_and(|s| s != contact.status) {
            return false;
        }
        if self.is_deleted.is_some_and(|d| d != contact.is_deleted()) {
            return false;
        }
        if self.created_from.is_some_and(|from| contact.created_at < from) {
            return false;
        }
        if self.created_to.is_some_and(|to| contact.created_at > to) {
            return false;
        }
        match &self.search {
            Some(term) => {
                let needle = term.to_lowercase();
                [contact.name.as_str(), contact.email.as_str(), contact.message.as_str()]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
            None => true,
        }
    }
}

/// Sortable columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Name,
    Email,
    Status,
}

impl SortField {
    pub const fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::Name => "name",
            SortField::Email => "email",
            SortField::Status => "status",
        }
    }

    fn compare(&self, a: &Contact, b: &Contact) -> Ordering {
        match self {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::Name => a.name.cmp(&b.name),
            SortField::Email => a.email.as_str().cmp(b.email.as_str()),
            SortField::Status => a.status.code().cmp(b.status.code()),
        }
    }
}

impl FromStr for SortField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" => Ok(SortField::CreatedAt),
            "updatedAt" => Ok(SortField::UpdatedAt),
            "name" => Ok(SortField::Name),
            "email" => Ok(SortField::Email),
            "status" => Ok(SortField::Status),
            other => Err(AppError::bad_request(format!("Cannot sort by {other}")).with_field(
                "sortBy",
                "Must be one of createdAt, updatedAt, name, email, status",
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub const fn sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "1" => Ok(SortOrder::Asc),
            "desc" | "-1" => Ok(SortOrder::Desc),
            _ => Err(AppError::bad_request(format!("Invalid sort order: {s}"))
                .with_field("sortOrder", "Must be asc or desc")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContactSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl ContactSort {
    /// Total order: the sort field, then id in the same direction
    pub fn compare(&self, a: &Contact, b: &Contact) -> Ordering {
        let ordering = self.field.compare(a, b).then_with(|| a.id.cmp(&b.id));
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Everything the list operation needs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactQuery {
    pub filter: ContactFilter,
    pub sort: ContactSort,
    pub page: PageRequest,
}
