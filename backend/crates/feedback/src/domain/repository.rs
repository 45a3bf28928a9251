//! Repository Traits

use uuid::Uuid;

use crate::domain::entities::{Comment, Review};
use crate::domain::value_objects::Score;
use crate::error::FeedbackResult;

/// Reviews, scoped to their title
#[trait_variant::make(ReviewRepository: Send)]
pub trait LocalReviewRepository {
    /// Parent check shared by every nested operation
    async fn title_exists(&self, title_id: i64) -> FeedbackResult<bool>;

    /// Reviews for a title, newest first
    async fn list_reviews(
        &self,
        title_id: i64,
        limit: i64,
        offset: i64,
    ) -> FeedbackResult<Vec<Review>>;

    async fn count_reviews(&self, title_id: i64) -> FeedbackResult<i64>;

    /// The review must belong to the given title
    async fn find_review(&self, title_id: i64, review_id: i64) -> FeedbackResult<Option<Review>>;

    /// Fast-path duplicate check; the unique constraint is the backstop
    async fn author_has_review(&self, title_id: i64, author_id: Uuid) -> FeedbackResult<bool>;

    async fn create_review(
        &self,
        title_id: i64,
        author_id: Uuid,
        text: &str,
        score: Score,
    ) -> FeedbackResult<Review>;

    async fn update_review(
        &self,
        review_id: i64,
        text: Option<&str>,
        score: Option<Score>,
    ) -> FeedbackResult<Review>;

    async fn delete_review(&self, review_id: i64) -> FeedbackResult<()>;
}

/// Comments, scoped to their review
#[trait_variant::make(CommentRepository: Send)]
pub trait LocalCommentRepository {
    /// Comments for a review, newest first
    async fn list_comments(
        &self,
        review_id: i64,
        limit: i64,
        offset: i64,
    ) -> FeedbackResult<Vec<Comment>>;

    async fn count_comments(&self, review_id: i64) -> FeedbackResult<i64>;

    /// The comment must belong to the given review
    async fn find_comment(
        &self,
        review_id: i64,
        comment_id: i64,
    ) -> FeedbackResult<Option<Comment>>;

    async fn create_comment(
        &self,
        review_id: i64,
        author_id: Uuid,
        text: &str,
    ) -> FeedbackResult<Comment>;

    async fn update_comment(&self, comment_id: i64, text: &str) -> FeedbackResult<Comment>;

    async fn delete_comment(&self, comment_id: i64) -> FeedbackResult<()>;
}
