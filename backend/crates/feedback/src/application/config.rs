//! Application Configuration

/// Feedback application configuration
#[derive(Debug, Clone)]
pub struct FeedbackConfig {
    /// Upper bound for the `limit` query parameter
    pub max_page_limit: u32,
    /// Tags kept per entry; extra tags are rejected
    pub max_tags: usize,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            max_page_limit: 100,
            max_tags: 20,
        }
    }
}

impl FeedbackConfig {
    pub fn development() -> Self {
        Self::default()
    }
}
