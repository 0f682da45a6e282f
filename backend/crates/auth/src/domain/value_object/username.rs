//! Username Value Object
//!
//! Optional public handle chosen at registration.
//!
//! ## Rules
//! - NFKC normalization, trim, then lowercase (the stored form)
//! - 3 to 30 characters
//! - ASCII letters, digits and `_ . -` only
//! - Starts and ends with a letter, digit or `_`
//! - No consecutive dots

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

// ============================================================================
// Constants
// ============================================================================

pub const USERNAME_MIN_LENGTH: usize = 3;

pub const USERNAME_MAX_LENGTH: usize = 30;

const ALLOWED_SPECIAL_CHARS: &[char] = &['_', '.', '-'];

/// Handles that would read as system accounts
const RESERVED_USERNAMES: &[&str] = &[
    "admin",
    "administrator",
    "root",
    "system",
    "superadmin",
    "moderator",
    "support",
    "api",
    "auth",
    "me",
    "null",
    "undefined",
];

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsernameError {
    #[error("Username must be at least {min} characters")]
    TooShort { length: usize, min: usize },

    #[error("Username must not exceed {max} characters")]
    TooLong { length: usize, max: usize },

    #[error("Invalid character '{0}'. Only a-z, 0-9, _, . and - are allowed")]
    InvalidCharacter(char),

    #[error("Username must start and end with a letter, digit or underscore")]
    InvalidEdge,

    #[error("Username cannot contain consecutive dots")]
    ConsecutiveDots,

    #[error("'{0}' is a reserved username")]
    Reserved(String),
}

// ============================================================================
// Username
// ============================================================================

/// Validated, lowercased username
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    pub fn new(input: impl AsRef<str>) -> Result<Self, UsernameError> {
        let canonical = input
            .as_ref()
            .nfkc()
            .collect::<String>()
            .trim()
            .to_lowercase();
        Self::validate(&canonical)?;
        Ok(Self(canonical))
    }

    /// Trusted constructor for values read back from the database
    ///
    /// Skips the reserved-word check so seeded accounts load.
    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Build a reserved handle for system accounts
    pub(crate) fn system(value: &str) -> Self {
        Self(value.to_string())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(name: &str) -> Result<(), UsernameError> {
        let length = name.chars().count();
        if length < USERNAME_MIN_LENGTH {
            return Err(UsernameError::TooShort {
                length,
                min: USERNAME_MIN_LENGTH,
            });
        }
        if length > USERNAME_MAX_LENGTH {
            return Err(UsernameError::TooLong {
                length,
                max: USERNAME_MAX_LENGTH,
            });
        }

        if let Some(c) = name.chars().find(|&c| !Self::is_valid_char(c)) {
            return Err(UsernameError::InvalidCharacter(c));
        }

        let edge_ok = |c: Option<char>| c.is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
        if !edge_ok(name.chars().next()) || !edge_ok(name.chars().last()) {
            return Err(UsernameError::InvalidEdge);
        }

        if name.contains("..") {
            return Err(UsernameError::ConsecutiveDots);
        }

        if RESERVED_USERNAMES.contains(&name) {
            return Err(UsernameError::Reserved(name.to_string()));
        }

        Ok(())
    }

    fn is_valid_char(c: char) -> bool {
        c.is_ascii_lowercase() || c.is_ascii_digit() || ALLOWED_SPECIAL_CHARS.contains(&c)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(name: Username) -> Self {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes() {
        assert_eq!(Username::new("  Jo_Doe ").unwrap().as_str(), "jo_doe");
        // Full-width letters fold to ASCII under NFKC
        assert_eq!(Username::new("ｊｏｅ").unwrap().as_str(), "joe");
    }

    #[test]
    fn test_length_bounds() {
        assert!(matches!(
            Username::new("ab"),
            Err(UsernameError::TooShort { length: 2, min: 3 })
        ));
        assert!(Username::new("abc").is_ok());
        assert!(Username::new("a".repeat(USERNAME_MAX_LENGTH)).is_ok());
        assert!(matches!(
            Username::new("a".repeat(USERNAME_MAX_LENGTH + 1)),
            Err(UsernameError::TooLong { .. })
        ));
    }

    #[test]
    fn test_characters_and_edges() {
        assert!(Username::new("jo.doe-1").is_ok());
        assert_eq!(
            Username::new("jo doe"),
            Err(UsernameError::InvalidCharacter(' '))
        );
        assert_eq!(Username::new("jo@doe"), Err(UsernameError::InvalidCharacter('@')));
        assert_eq!(Username::new(".jodoe"), Err(UsernameError::InvalidEdge));
        assert_eq!(Username::new("jodoe-"), Err(UsernameError::InvalidEdge));
        assert_eq!(Username::new("jo..doe"), Err(UsernameError::ConsecutiveDots));
    }

    #[test]
    fn test_reserved() {
        assert!(matches!(Username::new("Admin"), Err(UsernameError::Reserved(_))));
        assert_eq!(Username::from_db("superadmin").as_str(), "superadmin");
    }

    #[test]
    fn test_serde() {
        let name: Username = serde_json::from_str("\"Jo_Doe\"").unwrap();
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"jo_doe\"");
        assert!(serde_json::from_str::<Username>("\"x\"").is_err());
    }
}
