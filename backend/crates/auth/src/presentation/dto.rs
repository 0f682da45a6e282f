//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::actor::Role;
use kernel::error::app_error::{AppError, AppResult};
use kernel::validation::{Validator, is_http_url};
use platform::password::ClearTextPassword;
use serde::{Deserialize, Serialize};

use crate::application::{AuthSession, LoginInput, RegisterInput};
use crate::domain::entity::user::{NewUser, SocialLink, User, UserProfile};
use crate::domain::value_object::{profession::Profession, username::Username};

const BIO_MAX_LENGTH: usize = 500;

// ============================================================================
// Register
// ============================================================================

/// Request for POST /api/auth/register
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub username: Option<String>,
    pub role: Option<String>,
    pub profession: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub skills: Vec<String>,
    pub social_links: Vec<SocialLinkDto>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SocialLinkDto {
    pub platform: String,
    pub url: String,
}

impl RegisterRequest {
    /// Check every field, reporting all problems at once
    ///
    /// Whether the requested role may be self-assigned is decided by the
    /// use case, not here.
    pub fn validate(self) -> AppResult<RegisterInput> {
        let mut v = Validator::new();
        v.min_chars("fullName", "Full name", &self.full_name, 2);
        let email = v.email("email", &self.email);

        let password = match ClearTextPassword::new(self.password) {
            Ok(password) => Some(password),
            Err(err) => {
                v.push("password", err.to_string());
                None
            }
        };

        let username = match non_blank(self.username).map(Username::new).transpose() {
            Ok(username) => username,
            Err(err) => {
                v.push("username", err.to_string());
                None
            }
        };

        let role = match non_blank(self.role) {
            Some(role) => v.parse::<Role>("role", &role),
            None => Some(Role::default()),
        };
        let profession =
            non_blank(self.profession).and_then(|p| v.parse::<Profession>("profession", &p));

        let avatar = non_blank(self.avatar);
        let website = non_blank(self.website);
        let bio = non_blank(self.bio);
        v.optional_url("avatar", avatar.as_deref())
            .optional_url("website", website.as_deref());
        if let Some(bio) = &bio {
            v.max_chars("bio", "Bio", bio, BIO_MAX_LENGTH);
        }

        let mut social_links = Vec::with_capacity(self.social_links.len());
        for (i, link) in self.social_links.into_iter().enumerate() {
            let platform = link.platform.trim().to_string();
            let url = link.url.trim().to_string();
            if platform.is_empty() {
                v.push(format!("socialLinks[{i}].platform"), "Platform is required");
            }
            if !is_http_url(&url) {
                v.push(format!("socialLinks[{i}].url"), "Invalid URL format");
            }
            social_links.push(SocialLink { platform, url });
        }

        v.finish()?;
        let (Some(email), Some(password), Some(role)) = (email, password, role) else {
            return Err(AppError::bad_request("Validation failed"));
        };

        Ok(RegisterInput {
            user: NewUser {
                full_name: self.full_name.trim().to_string(),
                email,
                username,
                role,
                profession,
                profile: UserProfile {
                    avatar,
                    bio,
                    website,
                    location: non_blank(self.location),
                    skills: self
                        .skills
                        .into_iter()
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect(),
                    social_links,
                },
            },
            password,
        })
    }
}

// ============================================================================
// Login
// ============================================================================

/// Request for POST /api/auth/login
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(self) -> AppResult<LoginInput> {
        let mut v = Validator::new();
        let email = v.email("email", &self.email);
        v.check(!self.password.is_empty(), "password", "Password is required");
        v.finish()?;
        let email = email.ok_or_else(|| AppError::bad_request("Invalid email format"))?;

        Ok(LoginInput {
            email,
            password: self.password,
        })
    }
}

// ============================================================================
// Responses
// ============================================================================

/// User profile without credentials
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profession: Option<Profession>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub skills: Vec<String>,
    pub social_links: Vec<SocialLink>,
    pub is_active: bool,
    pub is_deleted: bool,
    pub is_deactivated: bool,
    pub is_email_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_hex(),
            full_name: user.full_name,
            email: user.email.into_inner(),
            username: user.username.map(String::from),
            role: user.role,
            profession: user.profession,
            avatar: user.profile.avatar,
            bio: user.profile.bio,
            website: user.profile.website,
            location: user.profile.location,
            skills: user.profile.skills,
            social_links: user.profile.social_links,
            is_active: user.is_active,
            is_deleted: user.is_deleted,
            is_deactivated: user.is_deactivated,
            is_email_verified: user.is_email_verified,
            last_login: user.last_login,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Body of register and login responses
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            user: session.user.into(),
            access_token: session.tokens.access_token,
            refresh_token: session.tokens.refresh_token,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
