//! Feedback Entities

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::value_objects::Score;

/// A review of a title. At most one per (author, title).
#[derive(Debug, Clone)]
pub struct Review {
    pub review_id: i64,
    pub title_id: i64,
    pub author_id: Uuid,
    /// Username resolved at read time for the wire representation
    pub author_username: String,
    pub text: String,
    pub score: Score,
    /// Set by the store at creation, never updated
    pub pub_date: DateTime<Utc>,
}

/// A comment on a review
#[derive(Debug, Clone)]
pub struct Comment {
    pub comment_id: i64,
    pub review_id: i64,
    pub author_id: Uuid,
    pub author_username: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
}
