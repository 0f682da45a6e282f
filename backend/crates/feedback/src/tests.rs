//! Unit tests for Feedback crate

use chrono::{Duration, Utc};
use kernel::id::FeedbackId;
use std::sync::Arc;

use crate::domain::entity::feedback::{Feedback, NewFeedback};
use crate::domain::value_object::classification::{FeedbackCategory, FeedbackSource};
use crate::infra::memory::InMemoryFeedbackRepository;

fn new_feedback(category: FeedbackCategory, title: &str, message: &str) -> NewFeedback {
    NewFeedback {
        category,
        title: title.to_string(),
        message: message.to_string(),
        rating: None,
        tags: Vec::new(),
        page_url: None,
        browser_info: None,
        ip_address: None,
        source: FeedbackSource::Web,
    }
}

/// Insert an entry submitted `minutes_ago` so ordering is deterministic
async fn seed(
    repo: &InMemoryFeedbackRepository,
    category: FeedbackCategory,
    title: &str,
    minutes_ago: i64,
) -> FeedbackId {
    let mut feedback = Feedback::submit(new_feedback(
        category,
        title,
        "Some detailed feedback text",
    ));
    feedback.submitted_at = Utc::now() - Duration::minutes(minutes_ago);
    feedback.updated_at = feedback.submitted_at;
    let id = feedback.id;
    repo.insert(feedback).await;
    id
}

#[cfg(test)]
mod use_case_tests {
    use super::*;
    use crate::application::{
        GetFeedbackUseCase, ListFeedbackUseCase, ReviewFeedbackUseCase, SubmitFeedbackUseCase,
    };
    use crate::domain::entity::feedback::FeedbackReview;
    use crate::domain::repository::FeedbackRepository;
    use crate::domain::value_object::{
        classification::FeedbackPriority,
        feedback_query::{FeedbackFilter, FeedbackQuery},
        feedback_status::FeedbackStatus,
    };
    use crate::error::FeedbackError;
    use kernel::id::UserId;
    use kernel::pagination::PageRequest;
    use tokio_test::assert_ok;

    fn repo() -> Arc<InMemoryFeedbackRepository> {
        Arc::new(InMemoryFeedbackRepository::new())
    }

    fn query(filter: FeedbackFilter, page: u32, limit: u32) -> FeedbackQuery {
        FeedbackQuery {
            filter,
            page: PageRequest::new(Some(page), Some(limit), 100).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_submit_and_get() {
        let repo = repo();
        let feedback = SubmitFeedbackUseCase::new(repo.clone())
            .execute(new_feedback(
                FeedbackCategory::Bug,
                "Broken link",
                "The footer link is broken",
            ))
            .await
            .unwrap();

        assert_eq!(feedback.status, FeedbackStatus::Pending);
        let fetched = GetFeedbackUseCase::new(repo)
            .execute(&feedback.id)
            .await
            .unwrap();
        assert_eq!(fetched, feedback);
    }

    #[tokio::test]
    async fn test_list_newest_first_with_pages() {
        let repo = repo();
        for i in 0..12 {
            seed(&repo, FeedbackCategory::Other, &format!("Entry {i}"), i).await;
        }

        let use_case = ListFeedbackUseCase::new(repo);
        let first = use_case
            .execute(query(FeedbackFilter::default(), 1, 5))
            .await
            .unwrap();
        assert_eq!(first.feedback[0].title, "Entry 0");
        assert_eq!(first.meta.total, 12);
        assert_eq!(first.meta.pages, 3);

        let last = use_case
            .execute(query(FeedbackFilter::default(), 3, 5))
            .await
            .unwrap();
        assert_eq!(last.feedback.len(), 2);
        assert_eq!(last.feedback[1].title, "Entry 11");
    }

    #[tokio::test]
    async fn test_list_filters() {
        let repo = repo();
        seed(&repo, FeedbackCategory::Bug, "Crash on login", 3).await;
        let ui = seed(&repo, FeedbackCategory::UiUx, "Contrast too low", 2).await;
        seed(&repo, FeedbackCategory::Bug, "Slow search", 1).await;

        repo.apply_review(&ui, &FeedbackReview::status(FeedbackStatus::Resolved))
            .await
            .unwrap();

        let use_case = ListFeedbackUseCase::new(repo);
        let bugs = use_case
            .execute(query(
                FeedbackFilter {
                    category: Some(FeedbackCategory::Bug),
                    ..Default::default()
                },
                1,
                10,
            ))
            .await
            .unwrap();
        assert_eq!(bugs.meta.total, 2);

        let resolved = use_case
            .execute(query(
                FeedbackFilter {
                    status: Some(FeedbackStatus::Resolved),
                    ..Default::default()
                },
                1,
                10,
            ))
            .await
            .unwrap();
        assert_eq!(resolved.feedback.len(), 1);
        assert_eq!(resolved.feedback[0].id, ui);

        let search = use_case
            .execute(query(
                FeedbackFilter {
                    search: Some("LOGIN".into()),
                    ..Default::default()
                },
                1,
                10,
            ))
            .await
            .unwrap();
        assert_eq!(search.feedback.len(), 1);
        assert_eq!(search.feedback[0].title, "Crash on login");
    }

    #[tokio::test]
    async fn test_resolve_then_reopen() {
        let repo = repo();
        let id = seed(&repo, FeedbackCategory::Bug, "Crash on login", 1).await;
        let use_case = ReviewFeedbackUseCase::new(repo.clone());
        let staff = UserId::new();

        let resolved = use_case
            .review(&id, FeedbackReview::status(FeedbackStatus::Resolved), staff)
            .await
            .unwrap();
        assert!(resolved.resolved_at.is_some());
        assert!(resolved.reviewed_at.is_some());

        let reopened = use_case
            .review(&id, FeedbackReview::status(FeedbackStatus::Reviewed), staff)
            .await
            .unwrap();
        assert!(reopened.resolved_at.is_none());
        assert_eq!(reopened.reviewed_at, resolved.reviewed_at);
    }

    #[tokio::test]
    async fn test_review_sets_triage_fields() {
        let repo = repo();
        let id = seed(&repo, FeedbackCategory::Performance, "Slow dashboard", 1).await;
        let assignee = UserId::new();

        let review = FeedbackReview::new(
            None,
            Some(FeedbackPriority::High),
            Some(Some("Profile the query".into())),
            Some(vec!["dashboard".into()]),
            Some(Some(assignee)),
        )
        .unwrap();
        let updated = ReviewFeedbackUseCase::new(repo)
            .review(&id, review, UserId::new())
            .await
            .unwrap();

        assert_eq!(updated.status, FeedbackStatus::Pending);
        assert_eq!(updated.priority, Some(FeedbackPriority::High));
        assert_eq!(updated.admin_notes.as_deref(), Some("Profile the query"));
        assert_eq!(updated.assigned_to, Some(assignee));
        assert!(updated.reviewed_at.is_none());
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let repo = repo();
        let missing = FeedbackId::new();

        assert!(matches!(
            GetFeedbackUseCase::new(repo.clone()).execute(&missing).await,
            Err(FeedbackError::NotFound)
        ));
        let use_case = ReviewFeedbackUseCase::new(repo);
        assert!(matches!(
            use_case
                .review(&missing, FeedbackReview::status(FeedbackStatus::Dismissed), UserId::new())
                .await,
            Err(FeedbackError::NotFound)
        ));
        assert!(matches!(
            use_case.delete(&missing, UserId::new()).await,
            Err(FeedbackError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let repo = repo();
        let id = seed(&repo, FeedbackCategory::Content, "Typo on about page", 1).await;

        assert_ok!(
            ReviewFeedbackUseCase::new(repo.clone())
                .delete(&id, UserId::new())
                .await
        );
        assert!(matches!(
            GetFeedbackUseCase::new(repo).execute(&id).await,
            Err(FeedbackError::NotFound)
        ));
    }
}

#[cfg(test)]
mod router_tests {
    use super::*;
    use crate::application::config::FeedbackConfig;
    use crate::presentation::router::feedback_router_generic;
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use kernel::actor::{Actor, Role};
    use kernel::id::UserId;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app(repo: &InMemoryFeedbackRepository, role: Option<Role>) -> Router {
        let router = feedback_router_generic(repo.clone(), FeedbackConfig::default());
        match role {
            Some(role) => router.layer(axum::Extension(Actor::new(UserId::new(), role))),
            None => router,
        }
    }

    async fn send(
        app: Router,
        method: Method,
        uri: &str,
        headers: &[(&str, &str)],
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_public_submit_captures_client() {
        let repo = InMemoryFeedbackRepository::new();
        let (status, body) = send(
            app(&repo, None),
            Method::POST,
            "/",
            &[
                ("user-agent", "Mozilla/5.0 Test"),
                ("x-forwarded-for", "198.51.100.4, 10.0.0.1"),
            ],
            Some(json!({
                "category": "feature_request",
                "title": "Export to CSV",
                "message": "Please let me export the report as CSV",
                "rating": 4
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Feedback submitted successfully");
        assert_eq!(body["data"]["status"], "pending");
        assert_eq!(body["data"]["source"], "web");
        assert_eq!(body["data"]["browserInfo"], "Mozilla/5.0 Test");
        assert_eq!(body["data"]["ipAddress"], "198.51.100.4");
        assert!(body["data"].get("resolvedAt").is_none());
    }

    #[tokio::test]
    async fn test_submit_validation_errors() {
        let repo = InMemoryFeedbackRepository::new();
        let (status, body) = send(
            app(&repo, None),
            Method::POST,
            "/",
            &[],
            Some(json!({ "category": "bug", "title": "", "message": "short" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_requires_staff() {
        let repo = InMemoryFeedbackRepository::new();

        let (status, _) = send(app(&repo, None), Method::GET, "/", &[], None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(app(&repo, Some(Role::Moderator)), Method::GET, "/", &[], None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        seed(&repo, FeedbackCategory::Bug, "Crash on login", 1).await;
        let (status, body) = send(
            app(&repo, Some(Role::Admin)),
            Method::GET,
            "/?category=bug&limit=5",
            &[],
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(body["meta"]["limit"], 5);
        assert_eq!(body["data"][0]["title"], "Crash on login");
    }

    #[tokio::test]
    async fn test_review_route() {
        let repo = InMemoryFeedbackRepository::new();
        let id = seed(&repo, FeedbackCategory::Bug, "Crash on login", 1).await;
        let uri = format!("/{}", id.to_hex());

        let (status, body) = send(
            app(&repo, Some(Role::Admin)),
            Method::PATCH,
            &uri,
            &[],
            Some(json!({ "status": "resolved", "priority": "high", "tags": ["Auth"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "resolved");
        assert_eq!(body["data"]["priority"], "high");
        assert_eq!(body["data"]["tags"], json!(["auth"]));
        assert!(body["data"]["resolvedAt"].is_string());
        assert!(body["data"]["reviewedAt"].is_string());

        let (status, _) = send(
            app(&repo, Some(Role::Admin)),
            Method::PATCH,
            &uri,
            &[],
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            app(&repo, Some(Role::Admin)),
            Method::GET,
            "/not-an-id",
            &[],
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);
    }

    #[tokio::test]
    async fn test_delete_is_superadmin_only() {
        let repo = InMemoryFeedbackRepository::new();
        let id = seed(&repo, FeedbackCategory::Other, "Hello", 1).await;
        let uri = format!("/{}", id.to_hex());

        let (status, _) = send(app(&repo, Some(Role::Admin)), Method::DELETE, &uri, &[], None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(
            app(&repo, Some(Role::SuperAdmin)),
            Method::DELETE,
            &uri,
            &[],
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Feedback deleted successfully");

        let (status, _) = send(app(&repo, Some(Role::Admin)), Method::GET, &uri, &[], None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
