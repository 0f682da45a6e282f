use kernel::error::app_error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Moderation status of a contact message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactStatus {
    #[default]
    Pending,
    Read,
    Replied,
    Solved,
    Removed,
}

impl ContactStatus {
    pub const ALL: [ContactStatus; 5] = [
        ContactStatus::Pending,
        ContactStatus::Read,
        ContactStatus::Replied,
        ContactStatus::Solved,
        ContactStatus::Removed,
    ];

    #[inline]
    pub const fn code(&self) -> &'static str {
        use ContactStatus::*;
        match self {
            Pending => "PENDING",
            Read => "READ",
            Replied => "REPLIED",
            Solved => "SOLVED",
            Removed => "REMOVED",
        }
    }

    /// Only soft delete may move a contact into `REMOVED`
    #[inline]
    pub const fn is_removed(&self) -> bool {
        matches!(self, ContactStatus::Removed)
    }

    /// Status read back from the database
    pub fn from_db(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ContactStatus {
    type Err = AppError;

    /// Case-insensitive, so `read` and `READ` are both accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::from_db(&upper).ok_or_else(|| {
            AppError::bad_request(format!("Invalid status: {s}")).with_field(
                "status",
                "Must be one of PENDING, READ, REPLIED, SOLVED, REMOVED",
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_roundtrip() {
        for status in ContactStatus::ALL {
            assert_eq!(ContactStatus::from_db(status.code()), Some(status));
            assert_eq!(status.code().parse::<ContactStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("read".parse::<ContactStatus>().unwrap(), ContactStatus::Read);
        assert_eq!(" Solved ".parse::<ContactStatus>().unwrap(), ContactStatus::Solved);
        assert!("ARCHIVED".parse::<ContactStatus>().is_err());
        assert_eq!(ContactStatus::from_db("read"), None);
    }

    #[test]
    fn test_serde_uses_screaming_case() {
        assert_eq!(serde_json::to_string(&ContactStatus::Replied).unwrap(), "\"REPLIED\"");
        assert_eq!(ContactStatus::default(), ContactStatus::Pending);
    }
}
