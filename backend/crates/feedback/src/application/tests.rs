//! Use-case tests over an in-memory repository.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use kernel::error::kind::ErrorKind;
use kernel::page::PageParams;
use kernel::principal::{AuthUser, Principal, Role};
use uuid::Uuid;

use crate::application::config::FeedbackConfig;
use crate::application::{CommentUseCase, ReviewUseCase};
use crate::domain::entities::{Comment, Review};
use crate::domain::repository::{CommentRepository, ReviewRepository};
use crate::domain::value_objects::Score;
use crate::error::{FeedbackError, FeedbackResult};

#[derive(Clone, Default)]
struct InMemoryFeedback {
    titles: Arc<Mutex<Vec<i64>>>,
    reviews: Arc<Mutex<Vec<Review>>>,
    comments: Arc<Mutex<Vec<Comment>>>,
}

impl InMemoryFeedback {
    fn with_title(title_id: i64) -> Self {
        let repo = Self::default();
        repo.titles.lock().unwrap().push(title_id);
        repo
    }
}

impl ReviewRepository for InMemoryFeedback {
    async fn title_exists(&self, title_id: i64) -> FeedbackResult<bool> {
        Ok(self.titles.lock().unwrap().contains(&title_id))
    }

    async fn list_reviews(
        &self,
        title_id: i64,
        limit: i64,
        offset: i64,
    ) -> FeedbackResult<Vec<Review>> {
        let reviews = self.reviews.lock().unwrap();
        let mut matching: Vec<Review> = reviews
            .iter()
            .filter(|r| r.title_id == title_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));
        Ok(matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_reviews(&self, title_id: i64) -> FeedbackResult<i64> {
        let reviews = self.reviews.lock().unwrap();
        Ok(reviews.iter().filter(|r| r.title_id == title_id).count() as i64)
    }

    async fn find_review(&self, title_id: i64, review_id: i64) -> FeedbackResult<Option<Review>> {
        let reviews = self.reviews.lock().unwrap();
        Ok(reviews
            .iter()
            .find(|r| r.title_id == title_id && r.review_id == review_id)
            .cloned())
    }

    async fn author_has_review(&self, title_id: i64, author_id: Uuid) -> FeedbackResult<bool> {
        let reviews = self.reviews.lock().unwrap();
        Ok(reviews
            .iter()
            .any(|r| r.title_id == title_id && r.author_id == author_id))
    }

    async fn create_review(
        &self,
        title_id: i64,
        author_id: Uuid,
        text: &str,
        score: Score,
    ) -> FeedbackResult<Review> {
        let mut reviews = self.reviews.lock().unwrap();
        // Mirrors the unique constraint backstop.
        if reviews
            .iter()
            .any(|r| r.title_id == title_id && r.author_id == author_id)
        {
            return Err(FeedbackError::DuplicateReview);
        }
        let review = Review {
            review_id: reviews.len() as i64 + 1,
            title_id,
            author_id,
            author_username: "author".to_string(),
            text: text.to_string(),
            score,
            pub_date: Utc::now(),
        };
        reviews.push(review.clone());
        Ok(review)
    }

    async fn update_review(
        &self,
        review_id: i64,
        text: Option<&str>,
        score: Option<Score>,
    ) -> FeedbackResult<Review> {
        let mut reviews = self.reviews.lock().unwrap();
        let review = reviews
            .iter_mut()
            .find(|r| r.review_id == review_id)
            .ok_or(FeedbackError::ReviewNotFound)?;
        if let Some(text) = text {
            review.text = text.to_string();
        }
        if let Some(score) = score {
            review.score = score;
        }
        Ok(review.clone())
    }

    async fn delete_review(&self, review_id: i64) -> FeedbackResult<()> {
        let mut reviews = self.reviews.lock().unwrap();
        let before = reviews.len();
        reviews.retain(|r| r.review_id != review_id);
        if reviews.len() == before {
            return Err(FeedbackError::ReviewNotFound);
        }
        Ok(())
    }
}

impl CommentRepository for InMemoryFeedback {
    async fn list_comments(
        &self,
        review_id: i64,
        limit: i64,
        offset: i64,
    ) -> FeedbackResult<Vec<Comment>> {
        let comments = self.comments.lock().unwrap();
        Ok(comments
            .iter()
            .filter(|c| c.review_id == review_id)
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count_comments(&self, review_id: i64) -> FeedbackResult<i64> {
        let comments = self.comments.lock().unwrap();
        Ok(comments.iter().filter(|c| c.review_id == review_id).count() as i64)
    }

    async fn find_comment(
        &self,
        review_id: i64,
        comment_id: i64,
    ) -> FeedbackResult<Option<Comment>> {
        let comments = self.comments.lock().unwrap();
        Ok(comments
            .iter()
            .find(|c| c.review_id == review_id && c.comment_id == comment_id)
            .cloned())
    }

    async fn create_comment(
        &self,
        review_id: i64,
        author_id: Uuid,
        text: &str,
    ) -> FeedbackResult<Comment> {
        let mut comments = self.comments.lock().unwrap();
        let comment = Comment {
            comment_id: comments.len() as i64 + 1,
            review_id,
            author_id,
            author_username: "author".to_string(),
            text: text.to_string(),
            pub_date: Utc::now(),
        };
        comments.push(comment.clone());
        Ok(comment)
    }

    async fn update_comment(&self, comment_id: i64, text: &str) -> FeedbackResult<Comment> {
        let mut comments = self.comments.lock().unwrap();
        let comment = comments
            .iter_mut()
            .find(|c| c.comment_id == comment_id)
            .ok_or(FeedbackError::CommentNotFound)?;
        comment.text = text.to_string();
        Ok(comment.clone())
    }

    async fn delete_comment(&self, comment_id: i64) -> FeedbackResult<()> {
        let mut comments = self.comments.lock().unwrap();
        let before = comments.len();
        comments.retain(|c| c.comment_id != comment_id);
        if comments.len() == before {
            return Err(FeedbackError::CommentNotFound);
        }
        Ok(())
    }
}

const TITLE: i64 = 1;

fn principal(role: Role) -> Principal {
    Principal::User(AuthUser {
        user_id: Uuid::new_v4(),
        username: "reader".to_string(),
        role,
        is_staff: false,
    })
}

fn reviews(repo: &Arc<InMemoryFeedback>) -> ReviewUseCase<InMemoryFeedback> {
    ReviewUseCase::new(repo.clone(), Arc::new(FeedbackConfig::default()))
}

fn comments(repo: &Arc<InMemoryFeedback>) -> CommentUseCase<InMemoryFeedback> {
    CommentUseCase::new(repo.clone(), Arc::new(FeedbackConfig::default()))
}

#[tokio::test]
async fn test_anonymous_cannot_review_but_can_read() {
    let repo = Arc::new(InMemoryFeedback::with_title(TITLE));
    let use_case = reviews(&repo);

    let err = use_case
        .create(&Principal::Anonymous, TITLE, "great", 8)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    let page = use_case
        .list(&Principal::Anonymous, TITLE, PageParams::new(1))
        .await
        .unwrap();
    assert_eq!(page.count, 0);
}

#[tokio::test]
async fn test_missing_title_is_not_found() {
    let repo = Arc::new(InMemoryFeedback::default());
    let use_case = reviews(&repo);

    let err = use_case
        .list(&Principal::Anonymous, 404, PageParams::new(1))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_second_review_by_same_author_conflicts() {
    let repo = Arc::new(InMemoryFeedback::with_title(TITLE));
    let use_case = reviews(&repo);
    let author = principal(Role::User);

    use_case.create(&author, TITLE, "great", 8).await.unwrap();
    let err = use_case
        .create(&author, TITLE, "changed my mind", 2)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    // A different author is fine.
    use_case
        .create(&principal(Role::User), TITLE, "agreed", 7)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_score_out_of_range_is_rejected() {
    let repo = Arc::new(InMemoryFeedback::with_title(TITLE));
    let use_case = reviews(&repo);
    let author = principal(Role::User);

    for score in [0, 11, -1] {
        let err = use_case
            .create(&author, TITLE, "great", score)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }
}

#[tokio::test]
async fn test_only_author_moderator_or_admin_mutates() {
    let repo = Arc::new(InMemoryFeedback::with_title(TITLE));
    let use_case = reviews(&repo);
    let author = principal(Role::User);

    let review = use_case.create(&author, TITLE, "great", 8).await.unwrap();

    // Another plain user is denied.
    let err = use_case
        .update(
            &principal(Role::User),
            TITLE,
            review.review_id,
            Some("vandalism"),
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    // The author may edit.
    let updated = use_case
        .update(&author, TITLE, review.review_id, None, Some(9))
        .await
        .unwrap();
    assert_eq!(updated.score.value(), 9);

    // A moderator may delete.
    use_case
        .delete(&principal(Role::Moderator), TITLE, review.review_id)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_revalidates_score() {
    let repo = Arc::new(InMemoryFeedback::with_title(TITLE));
    let use_case = reviews(&repo);
    let author = principal(Role::User);

    let review = use_case.create(&author, TITLE, "great", 8).await.unwrap();
    let err = use_case
        .update(&author, TITLE, review.review_id, None, Some(42))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);
}

#[tokio::test]
async fn test_comment_requires_review_under_path_title() {
    let repo = Arc::new(InMemoryFeedback::with_title(TITLE));
    repo.titles.lock().unwrap().push(2);

    let review_use_case = reviews(&repo);
    let comment_use_case = comments(&repo);
    let author = principal(Role::User);

    let review = review_use_case
        .create(&author, TITLE, "great", 8)
        .await
        .unwrap();

    // The review exists, but not under title 2.
    let err = comment_use_case
        .create(&author, 2, review.review_id, "nice take")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let comment = comment_use_case
        .create(&author, TITLE, review.review_id, "nice take")
        .await
        .unwrap();

    // Other users may read but not edit.
    let err = comment_use_case
        .update(
            &principal(Role::User),
            TITLE,
            review.review_id,
            comment.comment_id,
            "mine now",
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let fetched = comment_use_case
        .get(
            &Principal::Anonymous,
            TITLE,
            review.review_id,
            comment.comment_id,
        )
        .await
        .unwrap();
    assert_eq!(fetched.text, "nice take");
}

#[tokio::test]
async fn test_admin_may_delete_another_authors_review() {
    let repo = Arc::new(InMemoryFeedback::with_title(TITLE));
    let use_case = reviews(&repo);

    let review = use_case
        .create(&principal(Role::User), TITLE, "great", 8)
        .await
        .unwrap();

    // An admin who is not the author may delete.
    use_case
        .delete(&principal(Role::Admin), TITLE, review.review_id)
        .await
        .unwrap();

    let err = use_case
        .get(&Principal::Anonymous, TITLE, review.review_id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
