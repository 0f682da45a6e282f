//! Contact read use cases

use kernel::id::ContactId;
use kernel::pagination::{Page, PageMeta};
use std::sync::Arc;

use crate::domain::entity::contact::ContactView;
use crate::domain::repository::ContactRepository;
use crate::domain::value_object::contact_query::ContactQuery;
use crate::error::{ContactError, ContactResult};

/// A page of contacts with its pagination meta
#[derive(Debug, Clone)]
pub struct ContactListOutput {
    pub contacts: Vec<ContactView>,
    pub meta: PageMeta,
}

/// Filtered, sorted, paginated listing
pub struct ListContactsUseCase<R>
where
    R: ContactRepository,
{
    repo: Arc<R>,
}

impl<R> ListContactsUseCase<R>
where
    R: ContactRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, query: ContactQuery) -> ContactResult<ContactListOutput> {
        let Page { items, total } = self.repo.find_page(&query).await?;

        tracing::debug!(
            total,
            page = query.page.page(),
            returned = items.len(),
            "Listed contacts"
        );

        Ok(ContactListOutput {
            contacts: items,
            meta: PageMeta::new(query.page, total),
        })
    }
}

pub struct GetContactUseCase<R>
where
    R: ContactRepository,
{
    repo: Arc<R>,
}

impl<R> GetContactUseCase<R>
where
    R: ContactRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: &ContactId) -> ContactResult<ContactView> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ContactError::NotFound)
    }
}
