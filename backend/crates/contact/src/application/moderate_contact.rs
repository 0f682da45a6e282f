//! Moderate Contact Use Case
//!
//! Status changes, replies, soft delete / restore, permanent delete and
//! bulk status updates. Role checks happen in the handlers; this layer
//! only sees the acting user's id.

use kernel::id::{ContactId, UserId};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::entity::contact::{ContactChange, ContactView};
use crate::domain::repository::ContactRepository;
use crate::domain::value_object::contact_status::ContactStatus;
use crate::error::{ContactError, ContactResult};

pub struct ModerateContactUseCase<R>
where
    R: ContactRepository,
{
    repo: Arc<R>,
}

impl<R> ModerateContactUseCase<R>
where
    R: ContactRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn update_status(
        &self,
        id: &ContactId,
        status: ContactStatus,
        actor: UserId,
    ) -> ContactResult<ContactView> {
        let change = ContactChange::status(status)?;
        self.apply(id, change, actor).await
    }

    pub async fn reply(
        &self,
        id: &ContactId,
        message: &str,
        status: Option<ContactStatus>,
        actor: UserId,
    ) -> ContactResult<ContactView> {
        let change = ContactChange::reply(message, actor, status)?;
        self.apply(id, change, actor).await
    }

    pub async fn soft_delete(
        &self,
        id: &ContactId,
        reason: Option<&str>,
        actor: UserId,
    ) -> ContactResult<ContactView> {
        self.apply(id, ContactChange::remove(actor, reason), actor)
            .await
    }

    pub async fn restore(&self, id: &ContactId, actor: UserId) -> ContactResult<ContactView> {
        self.apply(id, ContactChange::restore(), actor).await
    }

    pub async fn permanent_delete(&self, id: &ContactId, actor: UserId) -> ContactResult<()> {
        if !self.repo.delete(id).await? {
            return Err(ContactError::NotFound);
        }
        tracing::info!(contact_id = %id, actor_id = %actor, "Contact permanently deleted");
        Ok(())
    }

    /// Returns the number of contacts updated; unknown and soft-deleted ids are skipped
    pub async fn bulk_update_status(
        &self,
        ids: &[ContactId],
        status: ContactStatus,
        actor: UserId,
    ) -> ContactResult<u64> {
        if status.is_removed() {
            return Err(ContactError::RemovedViaStatus);
        }

        let unique: Vec<ContactId> = ids
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let modified = self.repo.update_status_many(&unique, status).await?;

        tracing::info!(
            requested = unique.len(),
            modified,
            status = %status,
            actor_id = %actor,
            "Bulk status update"
        );

        Ok(modified)
    }

    async fn apply(
        &self,
        id: &ContactId,
        change: ContactChange,
        actor: UserId,
    ) -> ContactResult<ContactView> {
        let view = self.repo.apply_change(id, &change).await?;

        tracing::info!(
            contact_id = %id,
            actor_id = %actor,
            change = change.label(),
            status = %view.contact.status,
            "Contact updated"
        );

        Ok(view)
    }
}
