//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::actor::Role;
use kernel::id::UserId;
use kernel::validation::Email;
use platform::password::HashedPassword;
use sqlx::PgPool;
use sqlx::types::Json;

use crate::domain::entity::user::{SocialLink, User, UserProfile};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{profession::Profession, username::Username};
use crate::error::{AuthError, AuthResult};

const USER_COLUMNS: &str = r#"
    id, full_name, email, username, role, profession, password_hash,
    avatar, bio, website, location, skills, social_links,
    is_active, is_deleted, is_deactivated, is_email_verified,
    last_login, created_at, updated_at
"#;

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id,
                full_name,
                email,
                username,
                role,
                profession,
                password_hash,
                avatar,
                bio,
                website,
                location,
                skills,
                social_links,
                is_active,
                is_deleted,
                is_deactivated,
                is_email_verified,
                last_login,
                created_at,
                updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19, $20
            )
            "#,
        )
        .bind(user.id.to_hex())
        .bind(&user.full_name)
        .bind(user.email.as_str())
        .bind(user.username.as_ref().map(Username::as_str))
        .bind(user.role.code())
        .bind(user.profession.map(|p| p.code()))
        .bind(user.password_hash.as_phc_string())
        .bind(user.profile.avatar.as_deref())
        .bind(user.profile.bio.as_deref())
        .bind(user.profile.website.as_deref())
        .bind(user.profile.location.as_deref())
        .bind(&user.profile.skills)
        .bind(Json(&user.profile.social_links))
        .bind(user.is_active)
        .bind(user.is_deleted)
        .bind(user.is_deactivated)
        .bind(user.is_email_verified)
        .bind(user.last_login)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(unique_violation)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.to_hex())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn exists_by_username(&self, username: &Username) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)",
        )
        .bind(username.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn exists_with_role(&self, role: Role) -> AuthResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE role = $1)")
                .bind(role.code())
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn record_login(&self, id: &UserId, at: DateTime<Utc>) -> AuthResult<()> {
        sqlx::query("UPDATE users SET last_login = $2, updated_at = $2 WHERE id = $1")
            .bind(id.to_hex())
            .bind(at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Map the unique constraints from the users migration to domain errors
fn unique_violation(err: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db) = &err {
        match db.constraint() {
            Some("user_email_unique") => return AuthError::EmailTaken,
            Some("user_username_unique") => return AuthError::UsernameTaken,
            _ => {}
        }
    }
    AuthError::Database(err)
}

// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    full_name: String,
    email: String,
    username: Option<String>,
    role: String,
    profession: Option<String>,
    password_hash: String,
    avatar: Option<String>,
    bio: Option<String>,
    website: Option<String>,
    location: Option<String>,
    skills: Vec<String>,
    social_links: Json<Vec<SocialLink>>,
    is_active: bool,
    is_deleted: bool,
    is_deactivated: bool,
    is_email_verified: bool,
    last_login: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let corrupt = |what: &str, value: &str| {
            AuthError::Internal(format!("Malformed {what} in database: {value}"))
        };

        let id = UserId::parse_str(&self.id).map_err(|_| corrupt("user id", &self.id))?;
        let role: Role = self.role.parse().map_err(|_| corrupt("role", &self.role))?;
        let profession = self
            .profession
            .as_deref()
            .map(|p| p.parse::<Profession>().map_err(|_| corrupt("profession", p)))
            .transpose()?;
        let password_hash = HashedPassword::from_phc_string(self.password_hash)
            .map_err(|_| corrupt("password hash for user", &self.id))?;

        Ok(User {
            id,
            full_name: self.full_name,
            email: Email::from_db(self.email),
            username: self.username.map(Username::from_db),
            role,
            profession,
            password_hash,
            profile: UserProfile {
                avatar: self.avatar,
                bio: self.bio,
                website: self.website,
                location: self.location,
                skills: self.skills,
                social_links: self.social_links.0,
            },
            is_active: self.is_active,
            is_deleted: self.is_deleted,
            is_deactivated: self.is_deactivated,
            is_email_verified: self.is_email_verified,
            last_login: self.last_login,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
