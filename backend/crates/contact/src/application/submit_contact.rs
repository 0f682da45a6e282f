//! Submit Contact Use Case

use crate::domain::entity::contact::{Contact, ContactView, NewContact};
use crate::domain::repository::ContactRepository;
use crate::error::ContactResult;
use std::sync::Arc;

/// Public contact form submission
pub struct SubmitContactUseCase<R>
where
    R: ContactRepository,
{
    repo: Arc<R>,
}

impl<R> SubmitContactUseCase<R>
where
    R: ContactRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: NewContact) -> ContactResult<ContactView> {
        let contact = Contact::submit(input);
        self.repo.create(&contact).await?;

        tracing::info!(contact_id = %contact.id, "Contact submitted");

        Ok(ContactView::bare(contact))
    }
}
