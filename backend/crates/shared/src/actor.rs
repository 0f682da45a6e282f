//! Actor - the authenticated principal performing a request
//!
//! The auth middleware decodes the bearer token and places an [`Actor`]
//! into the request extensions. Handlers that need an identity take
//! `Actor` as an extractor and check its [`Role`] against an allow-list.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::app_error::AppError;
use crate::id::UserId;

/// Account role
///
/// Stored as its lowercase code (`"superadmin"`, `"admin"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    SuperAdmin,
    Admin,
    Moderator,
    #[default]
    User,
    Guest,
}

impl Role {
    /// Roles allowed to moderate contacts and triage feedback
    pub const STAFF: &'static [Role] = &[Role::Admin, Role::SuperAdmin];

    /// Roles allowed to irreversibly delete records
    pub const OWNER: &'static [Role] = &[Role::SuperAdmin];

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "superadmin",
            Role::Admin => "admin",
            Role::Moderator => "moderator",
            Role::User => "user",
            Role::Guest => "guest",
        }
    }

    /// Roles a visitor may pick for themselves when registering
    #[inline]
    pub const fn is_self_assignable(&self) -> bool {
        matches!(self, Role::User | Role::Guest)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "superadmin" => Ok(Role::SuperAdmin),
            "admin" => Ok(Role::Admin),
            "moderator" => Ok(Role::Moderator),
            "user" => Ok(Role::User),
            "guest" => Ok(Role::Guest),
            other => Err(AppError::bad_request(format!("Unknown role: {other}"))
                .with_field("role", "Must be one of superadmin, admin, moderator, user, guest")),
        }
    }
}

/// Authenticated principal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    /// Fail with 403 unless the actor holds one of `allowed`
    pub fn require_any(&self, allowed: &[Role]) -> Result<(), AppError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            tracing::warn!(actor_id = %self.id, role = %self.role, "Role not permitted");
            Err(AppError::forbidden(
                "You do not have permission to perform this action",
            ))
        }
    }
}

#[cfg(feature = "axum")]
impl<S> axum::extract::FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Actor>().copied().ok_or_else(|| {
            AppError::unauthorized("Authentication required")
                .with_action("Sign in and send the access token as a Bearer header")
        })
    }
}
