//! Contact Entity
//!
//! A message left by an unauthenticated visitor, and the moderation
//! state machine around it:
//!
//! ```text
//! PENDING ─┬─> READ / REPLIED / SOLVED      (status change, reply)
//!          └─> REMOVED                      (soft delete, from any live state)
//! REMOVED ───> PENDING                      (restore)
//! ```
//!
//! Removal is tracked by [`ContactRemoval`]; a contact is soft-deleted
//! exactly when it has one, and exactly then its status is `REMOVED`.

use chrono::{DateTime, Utc};
use kernel::id::{ContactId, UserId};
use kernel::validation::Email;

use crate::domain::value_object::contact_status::ContactStatus;
use crate::error::{ContactError, ContactResult};

/// Validated submission payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: Email,
    pub message: String,
    pub social_link: Option<String>,
}

/// Last reply sent to the visitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactReply {
    pub message: String,
    pub replied_by: UserId,
    pub replied_at: DateTime<Utc>,
}

/// Soft-delete audit record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRemoval {
    pub removed_by: UserId,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub email: Email,
    pub message: String,
    pub social_link: Option<String>,
    pub status: ContactStatus,
    pub reply: Option<ContactReply>,
    pub removal: Option<ContactRemoval>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    /// A freshly submitted contact: `PENDING`, not deleted, never replied
    pub fn submit(new: NewContact) -> Self {
        let now = Utc::now();
        Self {
            id: ContactId::new(),
            name: new.name,
            email: new.email,
            message: new.message,
            social_link: new.social_link,
            status: ContactStatus::Pending,
            reply: None,
            removal: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.removal.is_some()
    }

    /// Apply a moderation change in place
    pub fn apply(&mut self, change: &ContactChange) -> ContactResult<()> {
        if change.requires_live() && self.is_deleted() {
            return Err(ContactError::Removed);
        }

        match change {
            ContactChange::Status { status, at } => {
                self.status = *status;
                self.updated_at = *at;
            }
            ContactChange::Reply { reply, status } => {
                self.status = *status;
                self.updated_at = reply.replied_at;
                self.reply = Some(reply.clone());
            }
            ContactChange::Remove { removal, at } => {
                self.status = ContactStatus::Removed;
                self.removal = Some(removal.clone());
                self.updated_at = *at;
            }
            ContactChange::Restore { at } => {
                self.status = ContactStatus::Pending;
                self.removal = None;
                self.updated_at = *at;
            }
        }
        Ok(())
    }
}

/// A single-record moderation update
///
/// Each variant is written as one atomic update by the repository.
/// Constructors reject changes that would break the
/// `REMOVED` ⇔ deleted pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactChange {
    Status {
        status: ContactStatus,
        at: DateTime<Utc>,
    },
    Reply {
        reply: ContactReply,
        status: ContactStatus,
    },
    Remove {
        removal: ContactRemoval,
        at: DateTime<Utc>,
    },
    Restore {
        at: DateTime<Utc>,
    },
}

impl ContactChange {
    pub fn status(status: ContactStatus) -> ContactResult<Self> {
        if status.is_removed() {
            return Err(ContactError::RemovedViaStatus);
        }
        Ok(ContactChange::Status {
            status,
            at: Utc::now(),
        })
    }

    /// Reply; status becomes `REPLIED` unless overridden
    pub fn reply(
        message: &str,
        replied_by: UserId,
        status: Option<ContactStatus>,
    ) -> ContactResult<Self> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ContactError::EmptyReply);
        }
        let status = status.unwrap_or(ContactStatus::Replied);
        if status.is_removed() {
            return Err(ContactError::RemovedViaStatus);
        }
        Ok(ContactChange::Reply {
            reply: ContactReply {
                message: message.to_string(),
                replied_by,
                replied_at: Utc::now(),
            },
            status,
        })
    }

    /// Soft delete; a blank reason is stored as none
    pub fn remove(removed_by: UserId, reason: Option<&str>) -> Self {
        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);
        ContactChange::Remove {
            removal: ContactRemoval { removed_by, reason },
            at: Utc::now(),
        }
    }

    pub fn restore() -> Self {
        ContactChange::Restore { at: Utc::now() }
    }

    /// Status-changing updates are refused on soft-deleted contacts
    #[inline]
    pub fn requires_live(&self) -> bool {
        matches!(self, ContactChange::Status { .. } | ContactChange::Reply { .. })
    }

    /// Short name for logs
    pub fn label(&self) -> &'static str {
        match self {
            ContactChange::Status { .. } => "status",
            ContactChange::Reply { .. } => "reply",
            ContactChange::Remove { .. } => "soft_delete",
            ContactChange::Restore { .. } => "restore",
        }
    }
}

/// Minimal projection of a moderator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// A contact with its moderator references resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactView {
    pub contact: Contact,
    pub replied_by: Option<ActorSummary>,
    pub removed_by: Option<ActorSummary>,
}

impl ContactView {
    /// View without resolved actors
    pub fn bare(contact: Contact) -> Self {
        Self {
            contact,
            replied_by: None,
            removed_by: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> Contact {
        Contact::submit(NewContact {
            name: "Jo Lee".to_string(),
            email: Email::new("jo@x.com").unwrap(),
            message: "Need help with billing issue".to_string(),
            social_link: None,
        })
    }

    #[test]
    fn test_submit_starts_pending_and_live() {
        let c = contact();
        assert_eq!(c.status, ContactStatus::Pending);
        assert!(!c.is_deleted());
        assert!(c.reply.is_none());
        assert_eq!(c.created_at, c.updated_at);
    }

    #[test]
    fn test_status_change_touches_only_status() {
        let mut c = contact();
        let before = c.clone();
        c.apply(&ContactChange::status(ContactStatus::Read).unwrap())
            .unwrap();
        assert_eq!(c.status, ContactStatus::Read);
        assert_eq!(c.name, before.name);
        assert_eq!(c.message, before.message);
        assert_eq!(c.reply, before.reply);
        assert_eq!(c.removal, before.removal);
    }

    #[test]
    fn test_status_change_cannot_remove() {
        assert!(matches!(
            ContactChange::status(ContactStatus::Removed),
            Err(ContactError::RemovedViaStatus)
        ));
    }

    #[test]
    fn test_reply_sets_all_reply_fields() {
        let mut c = contact();
        let moderator = UserId::new();
        c.apply(&ContactChange::reply("  We'll refund you ", moderator, None).unwrap())
            .unwrap();

        let reply = c.reply.as_ref().unwrap();
        assert_eq!(reply.message, "We'll refund you");
        assert_eq!(reply.replied_by, moderator);
        assert_eq!(c.status, ContactStatus::Replied);
    }

    #[test]
    fn test_reply_override_and_overwrite() {
        let mut c = contact();
        let first = UserId::new();
        let second = UserId::new();
        c.apply(&ContactChange::reply("first", first, None).unwrap())
            .unwrap();
        c.apply(&ContactChange::reply("second", second, Some(ContactStatus::Solved)).unwrap())
            .unwrap();

        let reply = c.reply.as_ref().unwrap();
        assert_eq!(reply.message, "second");
        assert_eq!(reply.replied_by, second);
        assert_eq!(c.status, ContactStatus::Solved);
    }

    #[test]
    fn test_reply_rejects_blank_and_removed_override() {
        let by = UserId::new();
        assert!(matches!(
            ContactChange::reply("   ", by, None),
            Err(ContactError::EmptyReply)
        ));
        assert!(matches!(
            ContactChange::reply("ok", by, Some(ContactStatus::Removed)),
            Err(ContactError::RemovedViaStatus)
        ));
    }

    #[test]
    fn test_soft_delete_and_restore_keep_pairing() {
        let mut c = contact();
        let moderator = UserId::new();
        c.apply(&ContactChange::remove(moderator, Some("spam")))
            .unwrap();
        assert!(c.is_deleted());
        assert_eq!(c.status, ContactStatus::Removed);
        assert_eq!(c.removal.as_ref().unwrap().reason.as_deref(), Some("spam"));

        c.apply(&ContactChange::restore()).unwrap();
        assert!(!c.is_deleted());
        assert_eq!(c.status, ContactStatus::Pending);
        assert!(c.removal.is_none());
    }

    #[test]
    fn test_restore_resets_any_status_to_pending() {
        let mut c = contact();
        c.apply(&ContactChange::status(ContactStatus::Solved).unwrap())
            .unwrap();
        c.apply(&ContactChange::restore()).unwrap();
        assert_eq!(c.status, ContactStatus::Pending);
    }

    #[test]
    fn test_removed_contact_rejects_status_and_reply() {
        let mut c = contact();
        c.apply(&ContactChange::remove(UserId::new(), None)).unwrap();

        assert!(matches!(
            c.apply(&ContactChange::status(ContactStatus::Read).unwrap()),
            Err(ContactError::Removed)
        ));
        assert!(matches!(
            c.apply(&ContactChange::reply("hi", UserId::new(), None).unwrap()),
            Err(ContactError::Removed)
        ));
        assert_eq!(c.status, ContactStatus::Removed);
    }

    #[test]
    fn test_blank_remove_reason_is_none() {
        let change = ContactChange::remove(UserId::new(), Some("   "));
        match change {
            ContactChange::Remove { removal, .. } => assert!(removal.reason.is_none()),
            other => panic!("unexpected change {other:?}"),
        }
    }
}
