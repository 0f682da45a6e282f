//! User Entity
//!
//! Account, profile and lifecycle flags for one person.

use chrono::{DateTime, Utc};
use kernel::actor::{Actor, Role};
use kernel::id::UserId;
use kernel::validation::Email;
use platform::password::HashedPassword;
use serde::{Deserialize, Serialize};

use crate::domain::value_object::{profession::Profession, username::Username};

/// Link to a profile on another site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

/// Optional public profile fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub skills: Vec<String>,
    pub social_links: Vec<SocialLink>,
}

/// Validated registration data
#[derive(Debug)]
pub struct NewUser {
    pub full_name: String,
    pub email: Email,
    pub username: Option<Username>,
    pub role: Role,
    pub profession: Option<Profession>,
    pub profile: UserProfile,
}

/// Why an account may not sign in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountBlock {
    Deleted,
    Deactivated,
    Inactive,
}

impl AccountBlock {
    pub const fn message(&self) -> &'static str {
        match self {
            AccountBlock::Deleted => "This account has been deleted",
            AccountBlock::Deactivated => "This account has been deactivated",
            AccountBlock::Inactive => "This account is not active",
        }
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub email: Email,
    pub username: Option<Username>,
    pub role: Role,
    pub profession: Option<Profession>,
    pub password_hash: HashedPassword,
    pub profile: UserProfile,
    pub is_active: bool,
    pub is_deleted: bool,
    pub is_deactivated: bool,
    pub is_email_verified: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create an active, unverified account
    pub fn register(input: NewUser, password_hash: HashedPassword) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            full_name: input.full_name,
            email: input.email,
            username: input.username,
            role: input.role,
            profession: input.profession,
            password_hash,
            profile: input.profile,
            is_active: true,
            is_deleted: false,
            is_deactivated: false,
            is_email_verified: false,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// `Err` with the reason when the account may not sign in
    pub fn check_can_login(&self) -> Result<(), AccountBlock> {
        if self.is_deleted {
            Err(AccountBlock::Deleted)
        } else if self.is_deactivated {
            Err(AccountBlock::Deactivated)
        } else if !self.is_active {
            Err(AccountBlock::Inactive)
        } else {
            Ok(())
        }
    }

    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.last_login = Some(now);
        self.updated_at = now;
    }

    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::ClearTextPassword;

    fn user() -> User {
        let hash = ClearTextPassword::new("secret1".to_string())
            .unwrap()
            .hash(None)
            .unwrap();
        User::register(
            NewUser {
                full_name: "Jo Doe".to_string(),
                email: Email::new("jo@example.com").unwrap(),
                username: None,
                role: Role::User,
                profession: None,
                profile: UserProfile::default(),
            },
            hash,
        )
    }

    #[test]
    fn test_register_defaults() {
        let user = user();
        assert!(user.is_active);
        assert!(!user.is_email_verified);
        assert!(user.last_login.is_none());
        assert_eq!(user.check_can_login(), Ok(()));
        assert_eq!(user.actor(), Actor::new(user.id, Role::User));
    }

    #[test]
    fn test_blocked_accounts() {
        let mut user = user();
        user.is_active = false;
        assert_eq!(user.check_can_login(), Err(AccountBlock::Inactive));
        user.is_deactivated = true;
        assert_eq!(user.check_can_login(), Err(AccountBlock::Deactivated));
        user.is_deleted = true;
        assert_eq!(user.check_can_login(), Err(AccountBlock::Deleted));
    }

    #[test]
    fn test_record_login() {
        let mut user = user();
        user.record_login();
        assert_eq!(user.last_login, Some(user.updated_at));
    }
}
