//! Application Layer
//!
//! Use cases and application services. Policy checks live here because the
//! owner relation only becomes known after the entity is loaded.

pub mod comments;
pub mod config;
pub mod reviews;

#[cfg(test)]
mod tests;

// Re-exports
pub use comments::CommentUseCase;
pub use config::FeedbackConfig;
pub use reviews::ReviewUseCase;
