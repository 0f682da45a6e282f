//! HTTP Handlers

use axum::Extension;
use axum::extract::{ConnectInfo, Path, State};
use axum::http::HeaderMap;
use kernel::actor::{Actor, Role};
use kernel::extract::{ValidJson, ValidQuery};
use kernel::id::FeedbackId;
use kernel::response::ApiResponse;
use platform::client::ClientInfo;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::application::config::FeedbackConfig;
use crate::application::{
    GetFeedbackUseCase, ListFeedbackUseCase, ReviewFeedbackUseCase, SubmitFeedbackUseCase,
};
use crate::domain::repository::FeedbackRepository;
use crate::error::FeedbackResult;
use crate::presentation::dto::{
    FeedbackResponse, ListFeedbackParams, ReviewFeedbackRequest, SubmitFeedbackRequest,
};

/// Shared state for feedback handlers
#[derive(Clone)]
pub struct FeedbackAppState<R>
where
    R: FeedbackRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<FeedbackConfig>,
}

/// POST /api/feedback
///
/// The peer address is only known when the server runs with connect info.
pub async fn submit_feedback<R>(
    State(state): State<FeedbackAppState<R>>,
    connect_info: Option<Extension<ConnectInfo<SocketAddr>>>,
    headers: HeaderMap,
    ValidJson(req): ValidJson<SubmitFeedbackRequest>,
) -> FeedbackResult<ApiResponse<FeedbackResponse>>
where
    R: FeedbackRepository + Clone + Send + Sync + 'static,
{
    let peer = connect_info.map(|Extension(ConnectInfo(addr))| addr.ip());
    let client = ClientInfo::from_headers(&headers, peer);

    let input = req.validate(&client, state.config.max_tags)?;
    let feedback = SubmitFeedbackUseCase::new(state.repo.clone())
        .execute(input)
        .await?;

    Ok(ApiResponse::created(
        "Feedback submitted successfully",
        feedback.into(),
    ))
}

/// GET /api/feedback
pub async fn list_feedback<R>(
    State(state): State<FeedbackAppState<R>>,
    actor: Actor,
    ValidQuery(params): ValidQuery<ListFeedbackParams>,
) -> FeedbackResult<ApiResponse<Vec<FeedbackResponse>>>
where
    R: FeedbackRepository + Clone + Send + Sync + 'static,
{
    actor.require_any(Role::STAFF)?;

    let query = params.into_query(state.config.max_page_limit)?;
    let output = ListFeedbackUseCase::new(state.repo.clone())
        .execute(query)
        .await?;

    let feedback = output.feedback.into_iter().map(FeedbackResponse::from).collect();
    Ok(ApiResponse::ok("Feedback retrieved successfully", feedback).with_meta(output.meta))
}

/// GET /api/feedback/{id}
pub async fn get_feedback<R>(
    State(state): State<FeedbackAppState<R>>,
    actor: Actor,
    Path(id): Path<String>,
) -> FeedbackResult<ApiResponse<FeedbackResponse>>
where
    R: FeedbackRepository + Clone + Send + Sync + 'static,
{
    actor.require_any(Role::STAFF)?;

    let id = FeedbackId::parse_str(&id)?;
    let feedback = GetFeedbackUseCase::new(state.repo.clone())
        .execute(&id)
        .await?;

    Ok(ApiResponse::ok("Feedback retrieved successfully", feedback.into()))
}

/// PATCH /api/feedback/{id}
pub async fn review_feedback<R>(
    State(state): State<FeedbackAppState<R>>,
    actor: Actor,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<ReviewFeedbackRequest>,
) -> FeedbackResult<ApiResponse<FeedbackResponse>>
where
    R: FeedbackRepository + Clone + Send + Sync + 'static,
{
    actor.require_any(Role::STAFF)?;

    let id = FeedbackId::parse_str(&id)?;
    let review = req.validate(state.config.max_tags)?;
    let feedback = ReviewFeedbackUseCase::new(state.repo.clone())
        .review(&id, review, actor.id)
        .await?;

    Ok(ApiResponse::ok("Feedback updated successfully", feedback.into()))
}

/// DELETE /api/feedback/{id} (superadmin)
pub async fn delete_feedback<R>(
    State(state): State<FeedbackAppState<R>>,
    actor: Actor,
    Path(id): Path<String>,
) -> FeedbackResult<ApiResponse<Option<()>>>
where
    R: FeedbackRepository + Clone + Send + Sync + 'static,
{
    actor.require_any(Role::OWNER)?;

    let id = FeedbackId::parse_str(&id)?;
    ReviewFeedbackUseCase::new(state.repo.clone())
        .delete(&id, actor.id)
        .await?;

    Ok(ApiResponse::ok("Feedback deleted successfully", None))
}
