//! Category, priority and source of a feedback entry

use kernel::error::app_error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Category
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackCategory {
    Bug,
    FeatureRequest,
    Content,
    UiUx,
    Performance,
    Other,
}

impl FeedbackCategory {
    pub const ALL: [FeedbackCategory; 6] = [
        FeedbackCategory::Bug,
        FeedbackCategory::FeatureRequest,
        FeedbackCategory::Content,
        FeedbackCategory::UiUx,
        FeedbackCategory::Performance,
        FeedbackCategory::Other,
    ];

    pub const fn code(&self) -> &'static str {
        match self {
            FeedbackCategory::Bug => "bug",
            FeedbackCategory::FeatureRequest => "feature_request",
            FeedbackCategory::Content => "content",
            FeedbackCategory::UiUx => "ui_ux",
            FeedbackCategory::Performance => "performance",
            FeedbackCategory::Other => "other",
        }
    }

    pub fn from_db(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }
}

impl fmt::Display for FeedbackCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for FeedbackCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db(s.trim()).ok_or_else(|| {
            AppError::bad_request(format!("Invalid category: {s}")).with_field(
                "category",
                "Must be one of bug, feature_request, content, ui_ux, performance, other",
            )
        })
    }
}

// ============================================================================
// Priority
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackPriority {
    Low,
    Medium,
    High,
}

impl FeedbackPriority {
    pub const ALL: [FeedbackPriority; 3] = [
        FeedbackPriority::Low,
        FeedbackPriority::Medium,
        FeedbackPriority::High,
    ];

    pub const fn code(&self) -> &'static str {
        match self {
            FeedbackPriority::Low => "low",
            FeedbackPriority::Medium => "medium",
            FeedbackPriority::High => "high",
        }
    }

    pub fn from_db(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.code() == code)
    }
}

impl fmt::Display for FeedbackPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for FeedbackPriority {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db(&s.trim().to_ascii_lowercase()).ok_or_else(|| {
            AppError::bad_request(format!("Invalid priority: {s}"))
                .with_field("priority", "Must be one of low, medium, high")
        })
    }
}

// ============================================================================
// Source
// ============================================================================

/// Channel the feedback arrived through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackSource {
    #[default]
    Web,
    Mobile,
    Email,
}

impl FeedbackSource {
    pub const ALL: [FeedbackSource; 3] = [
        FeedbackSource::Web,
        FeedbackSource::Mobile,
        FeedbackSource::Email,
    ];

    pub const fn code(&self) -> &'static str {
        match self {
            FeedbackSource::Web => "web",
            FeedbackSource::Mobile => "mobile",
            FeedbackSource::Email => "email",
        }
    }

    pub fn from_db(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }
}

impl fmt::Display for FeedbackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for FeedbackSource {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db(&s.trim().to_ascii_lowercase()).ok_or_else(|| {
            AppError::bad_request(format!("Invalid source: {s}"))
                .with_field("source", "Must be one of web, mobile, email")
        })
    }
}
