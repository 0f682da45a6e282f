//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::ContactId;
use kernel::pagination::Page;

use crate::domain::entity::{
    contact::{Contact, ContactChange, ContactView},
    statistics::ContactStatistics,
};
use crate::domain::value_object::{contact_query::ContactQuery, contact_status::ContactStatus};
use crate::error::ContactResult;

/// Contact repository trait
#[trait_variant::make(ContactRepository: Send)]
pub trait LocalContactRepository {
    /// Insert a freshly submitted contact
    async fn create(&self, contact: &Contact) -> ContactResult<()>;

    /// Filtered, sorted page plus the total match count
    async fn find_page(&self, query: &ContactQuery) -> ContactResult<Page<ContactView>>;

    async fn find_by_id(&self, id: &ContactId) -> ContactResult<Option<ContactView>>;

    /// Apply one change atomically and return the updated view
    ///
    /// Fails with `NotFound` for unknown ids and `Removed` when the change
    /// needs a live contact and the stored one is soft-deleted.
    async fn apply_change(
        &self,
        id: &ContactId,
        change: &ContactChange,
    ) -> ContactResult<ContactView>;

    /// Hard delete. Returns whether a row existed
    async fn delete(&self, id: &ContactId) -> ContactResult<bool>;

    /// Set `status` on every live contact in `ids`. Returns the number changed
    async fn update_status_many(
        &self,
        ids: &[ContactId],
        status: ContactStatus,
    ) -> ContactResult<u64>;

    async fn statistics(&self, recent_limit: u32) -> ContactResult<ContactStatistics>;
}
