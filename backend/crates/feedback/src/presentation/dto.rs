//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::page::PageParams;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Comment, Review};
use crate::domain::value_objects::DEFAULT_SCORE;

/// Review representation
#[derive(Debug, Clone, Serialize)]
pub struct ReviewResponse {
    pub id: i64,
    pub text: String,
    /// Author's username
    pub author: String,
    pub score: i16,
    pub pub_date: DateTime<Utc>,
}

impl From<&Review> for ReviewResponse {
    fn from(review: &Review) -> Self {
        Self {
            id: review.review_id,
            text: review.text.clone(),
            author: review.author_username.clone(),
            score: review.score.value(),
            pub_date: review.pub_date,
        }
    }
}

fn default_score() -> i16 {
    DEFAULT_SCORE
}

/// Review creation request. Author and title come from the request
/// context, never from the body.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewCreateRequest {
    pub text: String,
    #[serde(default = "default_score")]
    pub score: i16,
}

/// Partial review update request
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewUpdateRequest {
    pub text: Option<String>,
    pub score: Option<i16>,
}

/// Comment representation
#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: i64,
    pub text: String,
    pub author: String,
    pub pub_date: DateTime<Utc>,
}

impl From<&Comment> for CommentResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.comment_id,
            text: comment.text.clone(),
            author: comment.author_username.clone(),
            pub_date: comment.pub_date,
        }
    }
}

/// Comment creation request
#[derive(Debug, Clone, Deserialize)]
pub struct CommentCreateRequest {
    pub text: String,
}

/// Partial comment update request
#[derive(Debug, Clone, Deserialize)]
pub struct CommentUpdateRequest {
    pub text: String,
}

/// Feedback list query string
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackListQuery {
    pub page: Option<u32>,
}

impl FeedbackListQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams::new(self.page.unwrap_or(1))
    }
}
