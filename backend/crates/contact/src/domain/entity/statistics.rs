//! Dashboard Statistics

use chrono::{DateTime, Utc};
use kernel::id::ContactId;
use kernel::validation::Email;

use crate::domain::value_object::contact_status::ContactStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCount {
    pub status: ContactStatus,
    pub count: u64,
}

/// Newest contacts, projected for the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentContact {
    pub id: ContactId,
    pub name: String,
    pub email: Email,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
}

/// Aggregates over the whole collection, soft-deleted contacts included
///
/// `by_status` only carries statuses that currently have contacts,
/// largest group first. `unread_count` counts live `PENDING` contacts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactStatistics {
    pub total_contacts: u64,
    pub by_status: Vec<StatusCount>,
    pub recent_contacts: Vec<RecentContact>,
    pub unread_count: u64,
}

impl ContactStatistics {
    /// Order groups by count descending, then status code
    pub fn sort_groups(groups: &mut [StatusCount]) {
        groups.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.status.code().cmp(b.status.code()))
        });
    }
}
