//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{Comment, Review};
use crate::domain::repository::{CommentRepository, ReviewRepository};
use crate::domain::value_objects::Score;
use crate::error::{FeedbackError, FeedbackResult};

/// PostgreSQL-backed feedback repository
#[derive(Clone)]
pub struct PgFeedbackRepository {
    pool: PgPool,
}

impl PgFeedbackRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// The unique constraint on (title_id, author_id) closes the race the
/// fast-path check leaves open.
fn map_duplicate_review(err: sqlx::Error) -> FeedbackError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some("23505")
            && db.constraint() == Some("reviews_title_id_author_id_key")
        {
            return FeedbackError::DuplicateReview;
        }
    }
    FeedbackError::Database(err)
}

const REVIEW_SELECT: &str = r#"
    SELECT
        r.review_id,
        r.title_id,
        r.author_id,
        u.username AS author_username,
        r.text,
        r.score,
        r.pub_date
    FROM reviews r
    JOIN users u ON u.user_id = r.author_id
"#;

const COMMENT_SELECT: &str = r#"
    SELECT
        c.comment_id,
        c.review_id,
        c.author_id,
        u.username AS author_username,
        c.text,
        c.pub_date
    FROM comments c
    JOIN users u ON u.user_id = c.author_id
"#;

impl ReviewRepository for PgFeedbackRepository {
    async fn title_exists(&self, title_id: i64) -> FeedbackResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM titles WHERE title_id = $1)")
                .bind(title_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn list_reviews(
        &self,
        title_id: i64,
        limit: i64,
        offset: i64,
    ) -> FeedbackResult<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            r#"
            {REVIEW_SELECT}
            WHERE r.title_id = $1
            ORDER BY r.pub_date DESC, r.review_id DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(title_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ReviewRow::into_review).collect())
    }

    async fn count_reviews(&self, title_id: i64) -> FeedbackResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM reviews WHERE title_id = $1",
        )
        .bind(title_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn find_review(&self, title_id: i64, review_id: i64) -> FeedbackResult<Option<Review>> {
        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            "{REVIEW_SELECT} WHERE r.title_id = $1 AND r.review_id = $2"
        ))
        .bind(title_id)
        .bind(review_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ReviewRow::into_review))
    }

    async fn author_has_review(&self, title_id: i64, author_id: Uuid) -> FeedbackResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM reviews WHERE title_id = $1 AND author_id = $2)",
        )
        .bind(title_id)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn create_review(
        &self,
        title_id: i64,
        author_id: Uuid,
        text: &str,
        score: Score,
    ) -> FeedbackResult<Review> {
        let review_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO reviews (title_id, author_id, text, score)
            VALUES ($1, $2, $3, $4)
            RETURNING review_id
            "#,
        )
        .bind(title_id)
        .bind(author_id)
        .bind(text)
        .bind(score.value())
        .fetch_one(&self.pool)
        .await
        .map_err(map_duplicate_review)?;

        self.find_review(title_id, review_id)
            .await?
            .ok_or(FeedbackError::ReviewNotFound)
    }

    async fn update_review(
        &self,
        review_id: i64,
        text: Option<&str>,
        score: Option<Score>,
    ) -> FeedbackResult<Review> {
        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            r#"
            WITH updated AS (
                UPDATE reviews SET
                    text = COALESCE($2, text),
                    score = COALESCE($3, score)
                WHERE review_id = $1
                RETURNING review_id, title_id, author_id, text, score, pub_date
            )
            SELECT
                r.review_id,
                r.title_id,
                r.author_id,
                u.username AS author_username,
                r.text,
                r.score,
                r.pub_date
            FROM updated r
            JOIN users u ON u.user_id = r.author_id
            "#
        ))
        .bind(review_id)
        .bind(text)
        .bind(score.map(|s| s.value()))
        .fetch_optional(&self.pool)
        .await?
        .ok_or(FeedbackError::ReviewNotFound)?;

        Ok(row.into_review())
    }

    async fn delete_review(&self, review_id: i64) -> FeedbackResult<()> {
        let result = sqlx::query("DELETE FROM reviews WHERE review_id = $1")
            .bind(review_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(FeedbackError::ReviewNotFound);
        }
        Ok(())
    }
}

impl CommentRepository for PgFeedbackRepository {
    async fn list_comments(
        &self,
        review_id: i64,
        limit: i64,
        offset: i64,
    ) -> FeedbackResult<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            r#"
            {COMMENT_SELECT}
            WHERE c.review_id = $1
            ORDER BY c.pub_date DESC, c.comment_id DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(review_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CommentRow::into_comment).collect())
    }

    async fn count_comments(&self, review_id: i64) -> FeedbackResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM comments WHERE review_id = $1",
        )
        .bind(review_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn find_comment(
        &self,
        review_id: i64,
        comment_id: i64,
    ) -> FeedbackResult<Option<Comment>> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            "{COMMENT_SELECT} WHERE c.review_id = $1 AND c.comment_id = $2"
        ))
        .bind(review_id)
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CommentRow::into_comment))
    }

    async fn create_comment(
        &self,
        review_id: i64,
        author_id: Uuid,
        text: &str,
    ) -> FeedbackResult<Comment> {
        let comment_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO comments (review_id, author_id, text)
            VALUES ($1, $2, $3)
            RETURNING comment_id
            "#,
        )
        .bind(review_id)
        .bind(author_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await?;

        self.find_comment(review_id, comment_id)
            .await?
            .ok_or(FeedbackError::CommentNotFound)
    }

    async fn update_comment(&self, comment_id: i64, text: &str) -> FeedbackResult<Comment> {
        let review_id: i64 = sqlx::query_scalar(
            "UPDATE comments SET text = $2 WHERE comment_id = $1 RETURNING review_id",
        )
        .bind(comment_id)
        .bind(text)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(FeedbackError::CommentNotFound)?;

        self.find_comment(review_id, comment_id)
            .await?
            .ok_or(FeedbackError::CommentNotFound)
    }

    async fn delete_comment(&self, comment_id: i64) -> FeedbackResult<()> {
        let result = sqlx::query("DELETE FROM comments WHERE comment_id = $1")
            .bind(comment_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(FeedbackError::CommentNotFound);
        }
        Ok(())
    }
}

// ============================================================================
// Row types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct ReviewRow {
    review_id: i64,
    title_id: i64,
    author_id: Uuid,
    author_username: String,
    text: String,
    score: i16,
    pub_date: DateTime<Utc>,
}

impl ReviewRow {
    fn into_review(self) -> Review {
        Review {
            review_id: self.review_id,
            title_id: self.title_id,
            author_id: self.author_id,
            author_username: self.author_username,
            text: self.text,
            score: Score::from_db(self.score),
            pub_date: self.pub_date,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    comment_id: i64,
    review_id: i64,
    author_id: Uuid,
    author_username: String,
    text: String,
    pub_date: DateTime<Utc>,
}

impl CommentRow {
    fn into_comment(self) -> Comment {
        Comment {
            comment_id: self.comment_id,
            review_id: self.review_id,
            author_id: self.author_id,
            author_username: self.author_username,
            text: self.text,
            pub_date: self.pub_date,
        }
    }
}
