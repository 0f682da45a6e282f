//! Application Configuration
//!
//! Configuration for the Contact application layer.

/// Contact application configuration
#[derive(Debug, Clone)]
pub struct ContactConfig {
    /// Upper bound for the `limit` query parameter
    pub max_page_limit: u32,
    /// Number of newest contacts shown on the dashboard
    pub recent_limit: u32,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            max_page_limit: 100,
            recent_limit: 5,
        }
    }
}

impl ContactConfig {
    /// Same limits; kept for symmetry with the other crates
    pub fn development() -> Self {
        Self::default()
    }
}
