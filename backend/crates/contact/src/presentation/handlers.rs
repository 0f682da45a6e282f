//! HTTP Handlers

use axum::body::Bytes;
use axum::extract::{Path, State};
use kernel::actor::{Actor, Role};
use kernel::error::app_error::AppError;
use kernel::extract::{ValidJson, ValidQuery};
use kernel::id::ContactId;
use kernel::response::ApiResponse;
use std::sync::Arc;

use crate::application::config::ContactConfig;
use crate::application::{
    ContactStatisticsUseCase, GetContactUseCase, ListContactsUseCase, ModerateContactUseCase,
    SubmitContactUseCase,
};
use crate::domain::repository::ContactRepository;
use crate::domain::value_object::contact_status::ContactStatus;
use crate::error::ContactResult;
use crate::presentation::dto::{
    BulkStatusRequest, BulkUpdateResponse, ContactResponse, ListContactsParams, ReplyRequest,
    SoftDeleteRequest, StatisticsResponse, SubmitContactRequest, UpdateStatusRequest,
};

/// Shared state for contact handlers
#[derive(Clone)]
pub struct ContactAppState<R>
where
    R: ContactRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<ContactConfig>,
}

// ============================================================================
// Public
// ============================================================================

/// POST /api/contacts
pub async fn submit_contact<R>(
    State(state): State<ContactAppState<R>>,
    ValidJson(req): ValidJson<SubmitContactRequest>,
) -> ContactResult<ApiResponse<ContactResponse>>
where
    R: ContactRepository + Clone + Send + Sync + 'static,
{
    let input = req.validate()?;
    let view = SubmitContactUseCase::new(state.repo.clone())
        .execute(input)
        .await?;

    Ok(ApiResponse::created(
        "Contact message sent successfully",
        view.into(),
    ))
}

// ============================================================================
// Read (admin+)
// ============================================================================

/// GET /api/contacts
pub async fn list_contacts<R>(
    State(state): State<ContactAppState<R>>,
    actor: Actor,
    ValidQuery(params): ValidQuery<ListContactsParams>,
) -> ContactResult<ApiResponse<Vec<ContactResponse>>>
where
    R: ContactRepository + Clone + Send + Sync + 'static,
{
    actor.require_any(Role::STAFF)?;

    let query = params.into_query(state.config.max_page_limit)?;
    let output = ListContactsUseCase::new(state.repo.clone())
        .execute(query)
        .await?;

    let contacts = output.contacts.into_iter().map(ContactResponse::from).collect();
    Ok(ApiResponse::ok("Contacts retrieved successfully", contacts).with_meta(output.meta))
}

/// GET /api/contacts/statistics
pub async fn statistics<R>(
    State(state): State<ContactAppState<R>>,
    actor: Actor,
) -> ContactResult<ApiResponse<StatisticsResponse>>
where
    R: ContactRepository + Clone + Send + Sync + 'static,
{
    actor.require_any(Role::STAFF)?;

    let stats = ContactStatisticsUseCase::new(state.repo.clone(), state.config.clone())
        .execute()
        .await?;

    Ok(ApiResponse::ok("Statistics retrieved successfully", stats.into()))
}

/// GET /api/contacts/{id}
pub async fn get_contact<R>(
    State(state): State<ContactAppState<R>>,
    actor: Actor,
    Path(id): Path<String>,
) -> ContactResult<ApiResponse<ContactResponse>>
where
    R: ContactRepository + Clone + Send + Sync + 'static,
{
    actor.require_any(Role::STAFF)?;

    let id = ContactId::parse_str(&id)?;
    let view = GetContactUseCase::new(state.repo.clone()).execute(&id).await?;

    Ok(ApiResponse::ok("Contact retrieved successfully", view.into()))
}

// ============================================================================
// Moderation (admin+)
// ============================================================================

/// PATCH /api/contacts/{id}/status
pub async fn update_status<R>(
    State(state): State<ContactAppState<R>>,
    actor: Actor,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<UpdateStatusRequest>,
) -> ContactResult<ApiResponse<ContactResponse>>
where
    R: ContactRepository + Clone + Send + Sync + 'static,
{
    actor.require_any(Role::STAFF)?;

    let id = ContactId::parse_str(&id)?;
    let status: ContactStatus = req.status.parse()?;
    let view = ModerateContactUseCase::new(state.repo.clone())
        .update_status(&id, status, actor.id)
        .await?;

    Ok(ApiResponse::ok(
        "Contact status updated successfully",
        view.into(),
    ))
}

/// POST /api/contacts/{id}/reply
pub async fn reply<R>(
    State(state): State<ContactAppState<R>>,
    actor: Actor,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<ReplyRequest>,
) -> ContactResult<ApiResponse<ContactResponse>>
where
    R: ContactRepository + Clone + Send + Sync + 'static,
{
    actor.require_any(Role::STAFF)?;

    let id = ContactId::parse_str(&id)?;
    let status = req
        .status
        .as_deref()
        .map(str::parse::<ContactStatus>)
        .transpose()?;
    let view = ModerateContactUseCase::new(state.repo.clone())
        .reply(&id, &req.reply_message, status, actor.id)
        .await?;

    Ok(ApiResponse::ok("Reply sent successfully", view.into()))
}

/// DELETE /api/contacts/{id}/soft
///
/// The body is optional; an empty body means no reason.
pub async fn soft_delete<R>(
    State(state): State<ContactAppState<R>>,
    actor: Actor,
    Path(id): Path<String>,
    body: Bytes,
) -> ContactResult<ApiResponse<ContactResponse>>
where
    R: ContactRepository + Clone + Send + Sync + 'static,
{
    actor.require_any(Role::STAFF)?;

    let id = ContactId::parse_str(&id)?;
    let req = if body.iter().all(u8::is_ascii_whitespace) {
        SoftDeleteRequest::default()
    } else {
        serde_json::from_slice::<SoftDeleteRequest>(&body).map_err(AppError::from)?
    };

    let view = ModerateContactUseCase::new(state.repo.clone())
        .soft_delete(&id, req.remove_reason.as_deref(), actor.id)
        .await?;

    Ok(ApiResponse::ok("Contact deleted successfully", view.into()))
}

/// POST /api/contacts/{id}/restore
pub async fn restore<R>(
    State(state): State<ContactAppState<R>>,
    actor: Actor,
    Path(id): Path<String>,
) -> ContactResult<ApiResponse<ContactResponse>>
where
    R: ContactRepository + Clone + Send + Sync + 'static,
{
    actor.require_any(Role::STAFF)?;

    let id = ContactId::parse_str(&id)?;
    let view = ModerateContactUseCase::new(state.repo.clone())
        .restore(&id, actor.id)
        .await?;

    Ok(ApiResponse::ok("Contact restored successfully", view.into()))
}

/// DELETE /api/contacts/{id}/permanent (superadmin)
pub async fn permanent_delete<R>(
    State(state): State<ContactAppState<R>>,
    actor: Actor,
    Path(id): Path<String>,
) -> ContactResult<ApiResponse<Option<()>>>
where
    R: ContactRepository + Clone + Send + Sync + 'static,
{
    actor.require_any(Role::OWNER)?;

    let id = ContactId::parse_str(&id)?;
    ModerateContactUseCase::new(state.repo.clone())
        .permanent_delete(&id, actor.id)
        .await?;

    Ok(ApiResponse::ok("Contact permanently deleted", None))
}

/// POST /api/contacts/bulk/status
pub async fn bulk_update_status<R>(
    State(state): State<ContactAppState<R>>,
    actor: Actor,
    ValidJson(req): ValidJson<BulkStatusRequest>,
) -> ContactResult<ApiResponse<BulkUpdateResponse>>
where
    R: ContactRepository + Clone + Send + Sync + 'static,
{
    actor.require_any(Role::STAFF)?;

    let (ids, status) = req.validate()?;
    let modified_count = ModerateContactUseCase::new(state.repo.clone())
        .bulk_update_status(&ids, status, actor.id)
        .await?;

    Ok(ApiResponse::ok(
        format!("{modified_count} contacts updated successfully"),
        BulkUpdateResponse { modified_count },
    ))
}
