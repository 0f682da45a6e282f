//! In-memory Repository
//!
//! Same semantics as the PostgreSQL repository, backed by maps. Used by
//! the test suite and for running the router without a database.

use std::collections::HashMap;
use std::sync::Arc;

use kernel::id::{ContactId, UserId};
use kernel::pagination::Page;
use tokio::sync::RwLock;

use crate::domain::entity::{
    contact::{ActorSummary, Contact, ContactChange, ContactView},
    statistics::{ContactStatistics, RecentContact, StatusCount},
};
use crate::domain::repository::ContactRepository;
use crate::domain::value_object::{contact_query::ContactQuery, contact_status::ContactStatus};
use crate::error::{ContactError, ContactResult};

#[derive(Clone, Default)]
pub struct InMemoryContactRepository {
    contacts: Arc<RwLock<HashMap<ContactId, Contact>>>,
    actors: Arc<RwLock<HashMap<UserId, ActorSummary>>>,
}

impl InMemoryContactRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a moderator resolvable in `repliedBy` / `removedBy`
    pub async fn register_actor(&self, actor: ActorSummary) {
        self.actors.write().await.insert(actor.id, actor);
    }

    /// Store a contact as-is, bypassing submission
    pub async fn insert(&self, contact: Contact) {
        self.contacts.write().await.insert(contact.id, contact);
    }

    async fn view(&self, contact: Contact) -> ContactView {
        let actors = self.actors.read().await;
        let resolve = |id: Option<UserId>| id.and_then(|id| actors.get(&id).cloned());

        ContactView {
            replied_by: resolve(contact.reply.as_ref().map(|r| r.replied_by)),
            removed_by: resolve(contact.removal.as_ref().map(|r| r.removed_by)),
            contact,
        }
    }
}

impl ContactRepository for InMemoryContactRepository {
    async fn create(&self, contact: &Contact) -> ContactResult<()> {
        let mut contacts = self.contacts.write().await;
        if contacts.contains_key(&contact.id) {
            return Err(ContactError::Internal(format!(
                "Duplicate contact id {}",
                contact.id
            )));
        }
        contacts.insert(contact.id, contact.clone());
        Ok(())
    }

    async fn find_page(&self, query: &ContactQuery) -> ContactResult<Page<ContactView>> {
        let mut matched: Vec<Contact> = {
            let contacts = self.contacts.read().await;
            contacts
                .values()
                .filter(|c| query.filter.matches(c))
                .cloned()
                .collect()
        };
        matched.sort_by(|a, b| query.sort.compare(a, b));

        let total = matched.len() as u64;
        let offset = usize::try_from(query.page.offset()).unwrap_or(usize::MAX);
        let limit = query.page.limit() as usize;

        let mut items = Vec::with_capacity(limit);
        for contact in matched.into_iter().skip(offset).take(limit) {
            items.push(self.view(contact).await);
        }

        Ok(Page::new(items, total))
    }

    async fn find_by_id(&self, id: &ContactId) -> ContactResult<Option<ContactView>> {
        let contact = self.contacts.read().await.get(id).cloned();
        match contact {
            Some(contact) => Ok(Some(self.view(contact).await)),
            None => Ok(None),
        }
    }

    async fn apply_change(
        &self,
        id: &ContactId,
        change: &ContactChange,
    ) -> ContactResult<ContactView> {
        let updated = {
            let mut contacts = self.contacts.write().await;
            let contact = contacts.get_mut(id).ok_or(ContactError::NotFound)?;
            contact.apply(change)?;
            contact.clone()
        };
        Ok(self.view(updated).await)
    }

    async fn delete(&self, id: &ContactId) -> ContactResult<bool> {
        Ok(self.contacts.write().await.remove(id).is_some())
    }

    async fn update_status_many(
        &self,
        ids: &[ContactId],
        status: ContactStatus,
    ) -> ContactResult<u64> {
        let change = ContactChange::status(status)?;
        let mut contacts = self.contacts.write().await;

        let mut modified = 0;
        for id in ids {
            if let Some(contact) = contacts.get_mut(id).filter(|c| !c.is_deleted()) {
                contact.apply(&change)?;
                modified += 1;
            }
        }
        Ok(modified)
    }

    async fn statistics(&self, recent_limit: u32) -> ContactResult<ContactStatistics> {
        let contacts = self.contacts.read().await;

        let mut counts: HashMap<ContactStatus, u64> = HashMap::new();
        for contact in contacts.values() {
            *counts.entry(contact.status).or_default() += 1;
        }
        let mut by_status: Vec<StatusCount> = counts
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect();
        ContactStatistics::sort_groups(&mut by_status);

        let mut newest: Vec<&Contact> = contacts.values().collect();
        newest.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        let recent_contacts = newest
            .into_iter()
            .take(recent_limit as usize)
            .map(|c| RecentContact {
                id: c.id,
                name: c.name.clone(),
                email: c.email.clone(),
                status: c.status,
                created_at: c.created_at,
            })
            .collect();

        let unread_count = contacts
            .values()
            .filter(|c| c.status == ContactStatus::Pending && !c.is_deleted())
            .count() as u64;

        Ok(ContactStatistics {
            total_contacts: contacts.len() as u64,
            by_status,
            recent_contacts,
            unread_count,
        })
    }
}
