//! Application Configuration

use kernel::page::DEFAULT_PAGE_SIZE;

/// Feedback application configuration
#[derive(Debug, Clone)]
pub struct FeedbackConfig {
    /// Page size for review and comment listings
    pub page_size: u32,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
