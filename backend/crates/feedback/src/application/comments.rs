//! Comment Use Cases
//!
//! Comments are addressed through their title and review; a review that
//! does not belong to the path title is treated as missing.

use std::sync::Arc;

use kernel::page::{PageParams, Paginated};
use kernel::policy::{self, Action, Relation, Resource};
use kernel::principal::Principal;

use crate::application::config::FeedbackConfig;
use crate::application::reviews::relation_to;
use crate::domain::entities::Comment;
use crate::domain::repository::{CommentRepository, ReviewRepository};
use crate::domain::value_objects::validate_text;
use crate::error::{FeedbackError, FeedbackResult};

/// Comment use cases
pub struct CommentUseCase<R>
where
    R: ReviewRepository + CommentRepository,
{
    repo: Arc<R>,
    config: Arc<FeedbackConfig>,
}

impl<R> CommentUseCase<R>
where
    R: ReviewRepository + CommentRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<FeedbackConfig>) -> Self {
        Self { repo, config }
    }

    async fn require_review(&self, title_id: i64, review_id: i64) -> FeedbackResult<()> {
        if !self.repo.title_exists(title_id).await? {
            return Err(FeedbackError::TitleNotFound);
        }
        self.repo
            .find_review(title_id, review_id)
            .await?
            .ok_or(FeedbackError::ReviewNotFound)?;
        Ok(())
    }

    pub async fn list(
        &self,
        principal: &Principal,
        title_id: i64,
        review_id: i64,
        params: PageParams,
    ) -> FeedbackResult<Paginated<Comment>> {
        policy::authorize(principal, Action::List, Resource::Comment, Relation::None)?;
        self.require_review(title_id, review_id).await?;

        let page_size = self.config.page_size;
        let count = self.repo.count_comments(review_id).await?;
        let results = self
            .repo
            .list_comments(review_id, params.limit(page_size), params.offset(page_size))
            .await?;
        Ok(Paginated::new(count, params, page_size, results))
    }

    pub async fn get(
        &self,
        principal: &Principal,
        title_id: i64,
        review_id: i64,
        comment_id: i64,
    ) -> FeedbackResult<Comment> {
        policy::authorize(principal, Action::Retrieve, Resource::Comment, Relation::None)?;
        self.require_review(title_id, review_id).await?;

        self.repo
            .find_comment(review_id, comment_id)
            .await?
            .ok_or(FeedbackError::CommentNotFound)
    }

    pub async fn create(
        &self,
        principal: &Principal,
        title_id: i64,
        review_id: i64,
        text: &str,
    ) -> FeedbackResult<Comment> {
        policy::authorize(principal, Action::Create, Resource::Comment, Relation::None)?;
        self.require_review(title_id, review_id).await?;

        validate_text(text)?;

        let author = principal
            .user()
            .ok_or_else(|| kernel::error::app_error::AppError::unauthorized("Not authenticated"))?;

        let comment = self
            .repo
            .create_comment(review_id, author.user_id, text)
            .await?;

        tracing::info!(
            comment_id = comment.comment_id,
            review_id = review_id,
            "Comment created"
        );

        Ok(comment)
    }

    pub async fn update(
        &self,
        principal: &Principal,
        title_id: i64,
        review_id: i64,
        comment_id: i64,
        text: &str,
    ) -> FeedbackResult<Comment> {
        self.require_review(title_id, review_id).await?;
        let comment = self
            .repo
            .find_comment(review_id, comment_id)
            .await?
            .ok_or(FeedbackError::CommentNotFound)?;

        policy::authorize(
            principal,
            Action::Update,
            Resource::Comment,
            relation_to(principal, comment.author_id),
        )?;

        validate_text(text)?;

        let comment = self.repo.update_comment(comment_id, text).await?;

        tracing::info!(comment_id = comment_id, "Comment updated");

        Ok(comment)
    }

    pub async fn delete(
        &self,
        principal: &Principal,
        title_id: i64,
        review_id: i64,
        comment_id: i64,
    ) -> FeedbackResult<()> {
        self.require_review(title_id, review_id).await?;
        let comment = self
            .repo
            .find_comment(review_id, comment_id)
            .await?
            .ok_or(FeedbackError::CommentNotFound)?;

        policy::authorize(
            principal,
            Action::Delete,
            Resource::Comment,
            relation_to(principal, comment.author_id),
        )?;

        self.repo.delete_comment(comment_id).await?;

        tracing::info!(comment_id = comment_id, "Comment deleted");

        Ok(())
    }
}
