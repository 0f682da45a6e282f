//! Token Claims
//!
//! Payload carried by both access and refresh tokens.

use kernel::actor::{Actor, Role};
use kernel::id::UserId;
use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// User id
    pub sub: UserId,
    /// Full name
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_img: Option<String>,
    pub role: Role,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration (Unix seconds)
    pub exp: i64,
}

impl Claims {
    pub fn for_user(user: &User, issued_at: i64, ttl_secs: i64) -> Self {
        Self {
            sub: user.id,
            name: user.full_name.clone(),
            email: user.email.to_string(),
            profile_img: user.profile.avatar.clone(),
            role: user.role,
            iat: issued_at,
            exp: issued_at + ttl_secs,
        }
    }

    pub fn actor(&self) -> Actor {
        Actor::new(self.sub, self.role)
    }
}
