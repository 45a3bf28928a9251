//! Review Use Cases

use std::sync::Arc;

use kernel::page::{PageParams, Paginated};
use kernel::policy::{self, Action, Relation, Resource};
use kernel::principal::Principal;

use crate::application::config::FeedbackConfig;
use crate::domain::entities::Review;
use crate::domain::repository::ReviewRepository;
use crate::domain::value_objects::{Score, validate_text};
use crate::error::{FeedbackError, FeedbackResult};

/// Review use cases
pub struct ReviewUseCase<R>
where
    R: ReviewRepository,
{
    repo: Arc<R>,
    config: Arc<FeedbackConfig>,
}

impl<R> ReviewUseCase<R>
where
    R: ReviewRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<FeedbackConfig>) -> Self {
        Self { repo, config }
    }

    async fn require_title(&self, title_id: i64) -> FeedbackResult<()> {
        if !self.repo.title_exists(title_id).await? {
            return Err(FeedbackError::TitleNotFound);
        }
        Ok(())
    }

    pub async fn list(
        &self,
        principal: &Principal,
        title_id: i64,
        params: PageParams,
    ) -> FeedbackResult<Paginated<Review>> {
        policy::authorize(principal, Action::List, Resource::Review, Relation::None)?;
        self.require_title(title_id).await?;

        let page_size = self.config.page_size;
        let count = self.repo.count_reviews(title_id).await?;
        let results = self
            .repo
            .list_reviews(title_id, params.limit(page_size), params.offset(page_size))
            .await?;
        Ok(Paginated::new(count, params, page_size, results))
    }

    pub async fn get(
        &self,
        principal: &Principal,
        title_id: i64,
        review_id: i64,
    ) -> FeedbackResult<Review> {
        policy::authorize(principal, Action::Retrieve, Resource::Review, Relation::None)?;
        self.require_title(title_id).await?;

        self.repo
            .find_review(title_id, review_id)
            .await?
            .ok_or(FeedbackError::ReviewNotFound)
    }

    pub async fn create(
        &self,
        principal: &Principal,
        title_id: i64,
        text: &str,
        score: i16,
    ) -> FeedbackResult<Review> {
        policy::authorize(principal, Action::Create, Resource::Review, Relation::None)?;
        self.require_title(title_id).await?;

        validate_text(text)?;
        let score = Score::new(score)?;

        // Authorize passed, so a user is present.
        let author = principal
            .user()
            .ok_or_else(|| kernel::error::app_error::AppError::unauthorized("Not authenticated"))?;

        if self.repo.author_has_review(title_id, author.user_id).await? {
            return Err(FeedbackError::DuplicateReview);
        }

        let review = self
            .repo
            .create_review(title_id, author.user_id, text, score)
            .await?;

        tracing::info!(
            review_id = review.review_id,
            title_id = title_id,
            "Review created"
        );

        Ok(review)
    }

    pub async fn update(
        &self,
        principal: &Principal,
        title_id: i64,
        review_id: i64,
        text: Option<&str>,
        score: Option<i16>,
    ) -> FeedbackResult<Review> {
        self.require_title(title_id).await?;
        let review = self
            .repo
            .find_review(title_id, review_id)
            .await?
            .ok_or(FeedbackError::ReviewNotFound)?;

        policy::authorize(
            principal,
            Action::Update,
            Resource::Review,
            relation_to(principal, review.author_id),
        )?;

        if let Some(text) = text {
            validate_text(text)?;
        }
        let score = score.map(Score::new).transpose()?;

        let review = self.repo.update_review(review_id, text, score).await?;

        tracing::info!(review_id = review_id, "Review updated");

        Ok(review)
    }

    pub async fn delete(
        &self,
        principal: &Principal,
        title_id: i64,
        review_id: i64,
    ) -> FeedbackResult<()> {
        self.require_title(title_id).await?;
        let review = self
            .repo
            .find_review(title_id, review_id)
            .await?
            .ok_or(FeedbackError::ReviewNotFound)?;

        policy::authorize(
            principal,
            Action::Delete,
            Resource::Review,
            relation_to(principal, review.author_id),
        )?;

        self.repo.delete_review(review_id).await?;

        tracing::info!(review_id = review_id, "Review deleted");

        Ok(())
    }
}

/// Owner when the principal authored the entity.
pub(crate) fn relation_to(principal: &Principal, author_id: uuid::Uuid) -> Relation {
    if principal.user_id() == Some(author_id) {
        Relation::Owner
    } else {
        Relation::None
    }
}
