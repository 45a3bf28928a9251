//! Feedback - Reviews and comments
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, score value object, repository traits
//! - `application/` - Use cases (review CRUD, comment CRUD)
//! - `infra/` - PostgreSQL repository
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - One review per (author, title), enforced by a fast-path check and a
//!   database unique constraint
//! - Reviews and comments are nested under their title / review and are
//!   mutable by the author, moderators, and admins only

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::FeedbackConfig;
pub use error::{FeedbackError, FeedbackResult};
pub use infra::postgres::PgFeedbackRepository;
pub use presentation::router::feedback_router;

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}
