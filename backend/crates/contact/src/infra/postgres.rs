//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::{ContactId, Id, UserId};
use kernel::pagination::Page;
use kernel::validation::Email;
use serde::Deserialize;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::domain::entity::{
    contact::{ActorSummary, Contact, ContactChange, ContactRemoval, ContactReply, ContactView},
    statistics::{ContactStatistics, RecentContact, StatusCount},
};
use crate::domain::repository::ContactRepository;
use crate::domain::value_object::{
    contact_query::{ContactFilter, ContactQuery},
    contact_status::ContactStatus,
};
use crate::error::{ContactError, ContactResult};

/// Columns of [`ContactRow`]; expects the contact aliased as `c`
const VIEW_COLUMNS: &str = r#"
    c.id, c.name, c.email, c.message, c.social_link, c.status,
    c.reply_message, c.replied_by, c.replied_at,
    c.is_deleted, c.removed_by, c.remove_reason,
    c.created_at, c.updated_at,
    ru.full_name AS replied_by_name, ru.email AS replied_by_email,
    mu.full_name AS removed_by_name, mu.email AS removed_by_email
"#;

const VIEW_JOINS: &str = r#"
    LEFT JOIN users ru ON ru.id = c.replied_by
    LEFT JOIN users mu ON mu.id = c.removed_by
"#;

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgContactRepository {
    pool: PgPool,
}

impl PgContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, id: &ContactId) -> ContactResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM contacts WHERE id = $1)")
                .bind(id.to_hex())
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}

impl ContactRepository for PgContactRepository {
    async fn create(&self, contact: &Contact) -> ContactResult<()> {
        sqlx::query(
            r#"
            INSERT INTO contacts (
                id,
                name,
                email,
                message,
                social_link,
                status,
                is_deleted,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(contact.id.to_hex())
        .bind(&contact.name)
        .bind(contact.email.as_str())
        .bind(&contact.message)
        .bind(contact.social_link.as_deref())
        .bind(contact.status.code())
        .bind(contact.is_deleted())
        .bind(contact.created_at)
        .bind(contact.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_page(&self, query: &ContactQuery) -> ContactResult<Page<ContactView>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM contacts c");
        push_filters(&mut count, &query.filter);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut select = QueryBuilder::<Postgres>::new(format!(
            "SELECT {VIEW_COLUMNS} FROM contacts c {VIEW_JOINS}"
        ));
        push_filters(&mut select, &query.filter);

        let column = query.sort.field.column();
        let direction = query.sort.order.sql();
        select.push(format_args!(
            " ORDER BY c.{column} {direction}, c.id {direction}"
        ));
        select
            .push(" LIMIT ")
            .push_bind(i64::from(query.page.limit()))
            .push(" OFFSET ")
            .push_bind(query.page.offset() as i64);

        let rows = select
            .build_query_as::<ContactRow>()
            .fetch_all(&self.pool)
            .await?;

        let items = rows
            .into_iter()
            .map(ContactRow::into_view)
            .collect::<ContactResult<Vec<_>>>()?;

        Ok(Page::new(items, total as u64))
    }

    async fn find_by_id(&self, id: &ContactId) -> ContactResult<Option<ContactView>> {
        let sql = format!("SELECT {VIEW_COLUMNS} FROM contacts c {VIEW_JOINS} WHERE c.id = $1");
        let row = sqlx::query_as::<_, ContactRow>(&sql)
            .bind(id.to_hex())
            .fetch_optional(&self.pool)
            .await?;

        row.map(ContactRow::into_view).transpose()
    }

    async fn apply_change(
        &self,
        id: &ContactId,
        change: &ContactChange,
    ) -> ContactResult<ContactView> {
        let guard = if change.requires_live() {
            " AND is_deleted = FALSE"
        } else {
            ""
        };
        let sql = format!(
            r#"
            WITH c AS (
                UPDATE contacts SET {set}
                WHERE id = $1{guard}
                RETURNING *
            )
            SELECT {VIEW_COLUMNS} FROM c {VIEW_JOINS}
            "#,
            set = set_clause(change),
        );

        let query = sqlx::query_as::<_, ContactRow>(&sql).bind(id.to_hex());
        let query = match change {
            ContactChange::Status { status, at } => query.bind(status.code()).bind(*at),
            ContactChange::Reply { reply, status } => query
                .bind(status.code())
                .bind(&reply.message)
                .bind(reply.replied_by.to_hex())
                .bind(reply.replied_at),
            ContactChange::Remove { removal, at } => query
                .bind(removal.removed_by.to_hex())
                .bind(removal.reason.as_deref())
                .bind(*at),
            ContactChange::Restore { at } => query.bind(*at),
        };

        match query.fetch_optional(&self.pool).await? {
            Some(row) => row.into_view(),
            None if self.exists(id).await? => {
                tracing::warn!(
                    contact_id = %id,
                    change = change.label(),
                    "Change refused on removed contact"
                );
                Err(ContactError::Removed)
            }
            None => Err(ContactError::NotFound),
        }
    }

    async fn delete(&self, id: &ContactId) -> ContactResult<bool> {
        let deleted = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id.to_hex())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn update_status_many(
        &self,
        ids: &[ContactId],
        status: ContactStatus,
    ) -> ContactResult<u64> {
        let ids: Vec<String> = ids.iter().map(|id| id.to_hex()).collect();

        let modified = sqlx::query(
            r#"
            UPDATE contacts
            SET status = $1, updated_at = $2
            WHERE id = ANY($3) AND is_deleted = FALSE
            "#,
        )
        .bind(status.code())
        .bind(Utc::now())
        .bind(ids)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(modified)
    }

    async fn statistics(&self, recent_limit: u32) -> ContactResult<ContactStatistics> {
        // One statement so every figure comes from the same snapshot
        let row = sqlx::query_as::<_, StatisticsRow>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM contacts) AS total_contacts,
                (SELECT COUNT(*) FROM contacts
                    WHERE status = 'PENDING' AND is_deleted = FALSE) AS unread_count,
                COALESCE((
                    SELECT json_agg(
                        json_build_object('status', g.status, 'count', g.count)
                        ORDER BY g.count DESC, g.status
                    )
                    FROM (SELECT status, COUNT(*) AS count FROM contacts GROUP BY status) g
                ), '[]'::json) AS by_status,
                COALESCE((
                    SELECT json_agg(
                        json_build_object(
                            'id', r.id,
                            'name', r.name,
                            'email', r.email,
                            'status', r.status,
                            'createdAt', r.created_at
                        )
                        ORDER BY r.created_at DESC, r.id DESC
                    )
                    FROM (
                        SELECT id, name, email, status, created_at
                        FROM contacts
                        ORDER BY created_at DESC, id DESC
                        LIMIT $1
                    ) r
                ), '[]'::json) AS recent_contacts
            "#,
        )
        .bind(i64::from(recent_limit))
        .fetch_one(&self.pool)
        .await?;

        row.into_statistics()
    }
}

/// `SET` list for a change; `$1` is always the contact id
fn set_clause(change: &ContactChange) -> &'static str {
    match change {
        ContactChange::Status { .. } => "status = $2, updated_at = $3",
        ContactChange::Reply { .. } => {
            "status = $2, reply_message = $3, replied_by = $4, replied_at = $5, updated_at = $5"
        }
        ContactChange::Remove { .. } => {
            "status = 'REMOVED', is_deleted = TRUE, removed_by = $2, remove_reason = $3, updated_at = $4"
        }
        ContactChange::Restore { .. } => {
            "status = 'PENDING', is_deleted = FALSE, removed_by = NULL, remove_reason = NULL, updated_at = $2"
        }
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &ContactFilter) {
    builder.push(" WHERE TRUE");

    if let Some(status) = filter.status {
        builder.push(" AND c.status = ").push_bind(status.code());
    }
    if let Some(is_deleted) = filter.is_deleted {
        builder.push(" AND c.is_deleted = ").push_bind(is_deleted);
    }
    if let Some(term) = &filter.search {
        let pattern = format!("%{}%", escape_like(term));
        builder
            .push(" AND (c.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR c.email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR c.message ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(from) = filter.created_from {
        builder.push(" AND c.created_at >= ").push_bind(from);
    }
    if let Some(to) = filter.created_to {
        builder.push(" AND c.created_at <= ").push_bind(to);
    }
}

/// Search terms are literal text, not LIKE patterns
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

fn parse_id<T>(raw: &str) -> ContactResult<Id<T>> {
    Id::parse_str(raw.trim())
        .map_err(|_| ContactError::Internal(format!("Malformed id in database: {raw}")))
}

fn parse_status(raw: &str) -> ContactResult<ContactStatus> {
    ContactStatus::from_db(raw)
        .ok_or_else(|| ContactError::Internal(format!("Unknown contact status in database: {raw}")))
}

fn summary(
    id: Option<UserId>,
    name: Option<String>,
    email: Option<String>,
) -> Option<ActorSummary> {
    Some(ActorSummary {
        id: id?,
        name: name?,
        email: email?,
    })
}

// Internal row types for sqlx mapping
#[derive(sqlx::FromRow)]
struct ContactRow {
    id: String,
    name: String,
    email: String,
    message: String,
    social_link: Option<String>,
    status: String,
    reply_message: Option<String>,
    replied_by: Option<String>,
    replied_at: Option<DateTime<Utc>>,
    is_deleted: bool,
    removed_by: Option<String>,
    remove_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    replied_by_name: Option<String>,
    replied_by_email: Option<String>,
    removed_by_name: Option<String>,
    removed_by_email: Option<String>,
}

impl ContactRow {
    fn into_view(self) -> ContactResult<ContactView> {
        let replied_by: Option<UserId> = self.replied_by.as_deref().map(parse_id).transpose()?;
        let removed_by: Option<UserId> = self.removed_by.as_deref().map(parse_id).transpose()?;

        let reply = match (self.reply_message, replied_by, self.replied_at) {
            (Some(message), Some(replied_by), Some(replied_at)) => Some(ContactReply {
                message,
                replied_by,
                replied_at,
            }),
            _ => None,
        };

        let removal = match (self.is_deleted, removed_by) {
            (true, Some(removed_by)) => Some(ContactRemoval {
                removed_by,
                reason: self.remove_reason,
            }),
            (true, None) => {
                return Err(ContactError::Internal(format!(
                    "Deleted contact {} has no remover",
                    self.id
                )));
            }
            (false, _) => None,
        };

        let contact = Contact {
            id: parse_id(&self.id)?,
            name: self.name,
            email: Email::from_db(self.email),
            message: self.message,
            social_link: self.social_link,
            status: parse_status(&self.status)?,
            reply,
            removal,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };

        Ok(ContactView {
            contact,
            replied_by: summary(replied_by, self.replied_by_name, self.replied_by_email),
            removed_by: summary(removed_by, self.removed_by_name, self.removed_by_email),
        })
    }
}

#[derive(sqlx::FromRow)]
struct StatisticsRow {
    total_contacts: i64,
    unread_count: i64,
    by_status: Json<Vec<StatusCountRow>>,
    recent_contacts: Json<Vec<RecentContactRow>>,
}

#[derive(Deserialize)]
struct StatusCountRow {
    status: String,
    count: i64,
}

#[derive(Deserialize)]
struct RecentContactRow {
    id: String,
    name: String,
    email: String,
    status: String,
    #[serde(rename = "createdAt")]
    created_at: DateTime<Utc>,
}

impl StatisticsRow {
    fn into_statistics(self) -> ContactResult<ContactStatistics> {
        let by_status = self
            .by_status
            .0
            .into_iter()
            .map(|g| {
                Ok(StatusCount {
                    status: parse_status(&g.status)?,
                    count: g.count as u64,
                })
            })
            .collect::<ContactResult<Vec<_>>>()?;

        let recent_contacts = self
            .recent_contacts
            .0
            .into_iter()
            .map(|r| {
                Ok(RecentContact {
                    id: parse_id(&r.id)?,
                    name: r.name,
                    email: Email::from_db(r.email),
                    status: parse_status(&r.status)?,
                    created_at: r.created_at,
                })
            })
            .collect::<ContactResult<Vec<_>>>()?;

        Ok(ContactStatistics {
            total_contacts: self.total_contacts as u64,
            by_status,
            recent_contacts,
            unread_count: self.unread_count as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("acme"), "acme");
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[test]
    fn test_set_clause_binds_follow_id() {
        let by = UserId::new();
        let change = ContactChange::reply("hi", by, None).unwrap();
        assert!(set_clause(&change).contains("replied_by = $4"));
        assert!(set_clause(&ContactChange::restore()).contains("removed_by = NULL"));
    }
}
