//! Cross-cutting validation rules
//!
//! [`Email`] is the one validated text type every domain shares.
//! [`Validator`] collects field errors so a request reports all of its
//! problems at once instead of the first one.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::app_error::{AppError, AppResult, FieldError};

/// Maximum email length (per RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;

/// Validated, lowercased email address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn new(email: impl Into<String>) -> AppResult<Self> {
        let email = email.into().trim().to_lowercase();

        if email.is_empty() {
            return Err(AppError::bad_request("Email is required").with_field("email", "Required"));
        }
        if email.len() > EMAIL_MAX_LENGTH || !Self::is_valid_format(&email) {
            return Err(AppError::bad_request("Invalid email format")
                .with_field("email", "Invalid email format"));
        }

        Ok(Self(email))
    }

    fn is_valid_format(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };
        if local.is_empty() || local.len() > 64 || local.chars().any(char::is_whitespace) {
            return false;
        }
        if domain.is_empty() || !domain.contains('.') || domain.contains('@') {
            return false;
        }
        if !domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return false;
        }
        !(domain.starts_with(['.', '-']) || domain.ends_with(['.', '-']) || domain.contains(".."))
    }

    /// Wrap a value read back from the database (already validated on write)
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl FromStr for Email {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        Email::new(s)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// `true` for absolute `http`/`https` URLs with a host
pub fn is_http_url(value: &str) -> bool {
    match url::Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

/// Accumulates field errors for a request payload
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Record `message` against `field` unless `ok`
    pub fn check(
        &mut self,
        ok: bool,
        field: &'static str,
        message: impl Into<Cow<'static, str>>,
    ) -> &mut Self {
        if !ok {
            self.push(field, message);
        }
        self
    }

    /// At least `min` characters after trimming
    pub fn min_chars(&mut self, field: &'static str, label: &str, value: &str, min: usize) -> &mut Self {
        let ok = value.trim().chars().count() >= min;
        self.check(ok, field, format!("{label} must be at least {min} characters"))
    }

    /// At most `max` characters
    pub fn max_chars(&mut self, field: &'static str, label: &str, value: &str, max: usize) -> &mut Self {
        let ok = value.chars().count() <= max;
        self.check(ok, field, format!("{label} must not exceed {max} characters"))
    }

    /// Optional http(s) URL
    pub fn optional_url(&mut self, field: &'static str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            self.check(is_http_url(value), field, "Invalid URL format");
        }
        self
    }

    /// Parse an email, recording a field error on failure
    pub fn email(&mut self, field: &'static str, value: &str) -> Option<Email> {
        match Email::new(value) {
            Ok(email) => Some(email),
            Err(err) => {
                self.push(field, err.message().to_string());
                None
            }
        }
    }

    /// Parse any `FromStr` value whose error is an [`AppError`]
    pub fn parse<T>(&mut self, field: &'static str, value: &str) -> Option<T>
    where
        T: FromStr<Err = AppError>,
    {
        match value.parse::<T>() {
            Ok(v) => Some(v),
            Err(err) => {
                self.push(field, err.message().to_string());
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok(())` when nothing was recorded, otherwise a 400 with every field error
    pub fn finish(self) -> AppResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(self.errors))
        }
    }
}
