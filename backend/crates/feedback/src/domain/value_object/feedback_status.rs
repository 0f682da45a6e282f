use kernel::error::app_error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Review state of a feedback entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStatus {
    #[default]
    Pending,
    Reviewed,
    Resolved,
    Dismissed,
}

impl FeedbackStatus {
    pub const ALL: [FeedbackStatus; 4] = [
        FeedbackStatus::Pending,
        FeedbackStatus::Reviewed,
        FeedbackStatus::Resolved,
        FeedbackStatus::Dismissed,
    ];

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            FeedbackStatus::Pending => "pending",
            FeedbackStatus::Reviewed => "reviewed",
            FeedbackStatus::Resolved => "resolved",
            FeedbackStatus::Dismissed => "dismissed",
        }
    }

    #[inline]
    pub const fn is_pending(&self) -> bool {
        matches!(self, FeedbackStatus::Pending)
    }

    #[inline]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, FeedbackStatus::Resolved)
    }

    pub fn from_db(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }
}

impl fmt::Display for FeedbackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for FeedbackStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db(&s.trim().to_ascii_lowercase()).ok_or_else(|| {
            AppError::bad_request(format!("Invalid status: {s}")).with_field(
                "status",
                "Must be one of pending, reviewed, resolved, dismissed",
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_roundtrip() {
        for status in FeedbackStatus::ALL {
            assert_eq!(status.code().parse::<FeedbackStatus>().unwrap(), status);
        }
        assert_eq!("RESOLVED".parse::<FeedbackStatus>().unwrap(), FeedbackStatus::Resolved);
        assert!("closed".parse::<FeedbackStatus>().is_err());
    }

    #[test]
    fn test_serde_is_snake_case() {
        assert_eq!(
            serde_json::to_string(&FeedbackStatus::Dismissed).unwrap(),
            "\"dismissed\""
        );
        assert_eq!(FeedbackStatus::default(), FeedbackStatus::Pending);
    }
}
