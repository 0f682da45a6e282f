//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::{FeedbackId, UserId};
use kernel::pagination::Page;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::domain::entity::feedback::{Feedback, FeedbackReview};
use crate::domain::repository::FeedbackRepository;
use crate::domain::value_object::{
    classification::{FeedbackCategory, FeedbackPriority, FeedbackSource},
    feedback_query::{FeedbackFilter, FeedbackQuery},
    feedback_status::FeedbackStatus,
};
use crate::error::{FeedbackError, FeedbackResult};

const FEEDBACK_COLUMNS: &str = r#"
    id, category, title, message, rating, status, priority, admin_notes,
    submitted_at, reviewed_at, resolved_at, tags, page_url, browser_info,
    ip_address, source, assigned_to, updated_at
"#;

/// PostgreSQL-backed feedback repository
#[derive(Clone)]
pub struct PgFeedbackRepository {
    pool: PgPool,
}

impl PgFeedbackRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl FeedbackRepository for PgFeedbackRepository {
    async fn create(&self, feedback: &Feedback) -> FeedbackResult<()> {
        sqlx::query(
            r#"
            INSERT INTO feedback (
                id,
                category,
                title,
                message,
                rating,
                status,
                submitted_at,
                tags,
                page_url,
                browser_info,
                ip_address,
                source,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(feedback.id.to_hex())
        .bind(feedback.category.code())
        .bind(&feedback.title)
        .bind(&feedback.message)
        .bind(feedback.rating.map(i16::from))
        .bind(feedback.status.code())
        .bind(feedback.submitted_at)
        .bind(&feedback.tags)
        .bind(feedback.page_url.as_deref())
        .bind(feedback.browser_info.as_deref())
        .bind(feedback.ip_address.as_deref())
        .bind(feedback.source.code())
        .bind(feedback.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_page(&self, query: &FeedbackQuery) -> FeedbackResult<Page<Feedback>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM feedback");
        push_filters(&mut count, &query.filter);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut select =
            QueryBuilder::<Postgres>::new(format!("SELECT {FEEDBACK_COLUMNS} FROM feedback"));
        push_filters(&mut select, &query.filter);
        select
            .push(" ORDER BY submitted_at DESC, id DESC LIMIT ")
            .push_bind(i64::from(query.page.limit()))
            .push(" OFFSET ")
            .push_bind(query.page.offset() as i64);

        let items = select
            .build_query_as::<FeedbackRow>()
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(FeedbackRow::into_feedback)
            .collect::<FeedbackResult<Vec<_>>>()?;

        Ok(Page::new(items, total as u64))
    }

    async fn find_by_id(&self, id: &FeedbackId) -> FeedbackResult<Option<Feedback>> {
        let row = sqlx::query_as::<_, FeedbackRow>(&format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE id = $1"
        ))
        .bind(id.to_hex())
        .fetch_optional(&self.pool)
        .await?;

        row.map(FeedbackRow::into_feedback).transpose()
    }

    async fn apply_review(
        &self,
        id: &FeedbackId,
        review: &FeedbackReview,
    ) -> FeedbackResult<Feedback> {
        // Right-hand column references see the pre-update row
        let sql = format!(
            r#"
            UPDATE feedback SET
                status = COALESCE($2, status),
                priority = COALESCE($3, priority),
                admin_notes = CASE WHEN $4 THEN $5 ELSE admin_notes END,
                tags = COALESCE($6, tags),
                assigned_to = CASE WHEN $7 THEN $8 ELSE assigned_to END,
                reviewed_at = CASE
                    WHEN reviewed_at IS NULL AND COALESCE($2, status) <> 'pending' THEN $9
                    ELSE reviewed_at
                END,
                resolved_at = CASE
                    WHEN COALESCE($2, status) = 'resolved' THEN COALESCE(resolved_at, $9)
                    ELSE NULL
                END,
                updated_at = $9
            WHERE id = $1
            RETURNING {FEEDBACK_COLUMNS}
            "#
        );

        let notes = review.admin_notes.as_ref();
        let assignee = review.assigned_to;
        let row = sqlx::query_as::<_, FeedbackRow>(&sql)
            .bind(id.to_hex())
            .bind(review.status.map(|s| s.code()))
            .bind(review.priority.map(|p| p.code()))
            .bind(notes.is_some())
            .bind(notes.and_then(|n| n.as_deref()))
            .bind(review.tags.as_ref())
            .bind(assignee.is_some())
            .bind(assignee.flatten().map(|u| u.to_hex()))
            .bind(review.at)
            .fetch_optional(&self.pool)
            .await
            .map_err(foreign_key_violation)?;

        row.ok_or(FeedbackError::NotFound)?.into_feedback()
    }

    async fn delete(&self, id: &FeedbackId) -> FeedbackResult<bool> {
        let deleted = sqlx::query("DELETE FROM feedback WHERE id = $1")
            .bind(id.to_hex())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

fn foreign_key_violation(err: sqlx::Error) -> FeedbackError {
    let is_assignee_fk = matches!(
        &err,
        sqlx::Error::Database(db) if db.constraint() == Some("feedback_assigned_to_fkey")
    );
    if is_assignee_fk {
        FeedbackError::AssigneeNotFound
    } else {
        FeedbackError::Database(err)
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &FeedbackFilter) {
    builder.push(" WHERE TRUE");

    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.code());
    }
    if let Some(category) = filter.category {
        builder.push(" AND category = ").push_bind(category.code());
    }
    if let Some(priority) = filter.priority {
        builder.push(" AND priority = ").push_bind(priority.code());
    }
    if let Some(term) = &filter.search {
        let pattern = format!("%{}%", escape_like(term));
        builder
            .push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR message ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct FeedbackRow {
    id: String,
    category: String,
    title: String,
    message: String,
    rating: Option<i16>,
    status: String,
    priority: Option<String>,
    admin_notes: Option<String>,
    submitted_at: DateTime<Utc>,
    reviewed_at: Option<DateTime<Utc>>,
    resolved_at: Option<DateTime<Utc>>,
    tags: Vec<String>,
    page_url: Option<String>,
    browser_info: Option<String>,
    ip_address: Option<String>,
    source: String,
    assigned_to: Option<String>,
    updated_at: DateTime<Utc>,
}

impl FeedbackRow {
    fn into_feedback(self) -> FeedbackResult<Feedback> {
        let corrupt = |what: &str, value: &str| {
            FeedbackError::Internal(format!("Malformed {what} in database: {value}"))
        };

        let id = FeedbackId::parse_str(&self.id).map_err(|_| corrupt("feedback id", &self.id))?;
        let category = FeedbackCategory::from_db(&self.category)
            .ok_or_else(|| corrupt("category", &self.category))?;
        let status =
            FeedbackStatus::from_db(&self.status).ok_or_else(|| corrupt("status", &self.status))?;
        let priority = self
            .priority
            .as_deref()
            .map(|p| FeedbackPriority::from_db(p).ok_or_else(|| corrupt("priority", p)))
            .transpose()?;
        let source =
            FeedbackSource::from_db(&self.source).ok_or_else(|| corrupt("source", &self.source))?;
        let rating = self
            .rating
            .map(|r| u8::try_from(r).map_err(|_| corrupt("rating", &r.to_string())))
            .transpose()?;
        let assigned_to = self
            .assigned_to
            .as_deref()
            .map(|u| UserId::parse_str(u).map_err(|_| corrupt("assignee id", u)))
            .transpose()?;

        Ok(Feedback {
            id,
            category,
            title: self.title,
            message: self.message,
            rating,
            status,
            priority,
            admin_notes: self.admin_notes,
            submitted_at: self.submitted_at,
            reviewed_at: self.reviewed_at,
            resolved_at: self.resolved_at,
            tags: self.tags,
            page_url: self.page_url,
            browser_info: self.browser_info,
            ip_address: self.ip_address,
            source,
            assigned_to,
            updated_at: self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("ui_ux"), "ui\\_ux");
    }
}
