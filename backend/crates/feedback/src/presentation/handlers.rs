//! HTTP Handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use std::sync::Arc;

use kernel::extract::Json;
use kernel::page::Paginated;
use kernel::principal::Principal;

use crate::application::config::FeedbackConfig;
use crate::application::{CommentUseCase, ReviewUseCase};
use crate::domain::repository::{CommentRepository, ReviewRepository};
use crate::error::FeedbackResult;
use crate::presentation::dto::{
    CommentCreateRequest, CommentResponse, CommentUpdateRequest, FeedbackListQuery,
    ReviewCreateRequest, ReviewResponse, ReviewUpdateRequest,
};

/// Shared state for feedback handlers
#[derive(Clone)]
pub struct FeedbackAppState<R>
where
    R: ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<FeedbackConfig>,
}

// ============================================================================
// Reviews
// ============================================================================

/// GET /api/v1/titles/{title_id}/reviews
pub async fn list_reviews<R>(
    State(state): State<FeedbackAppState<R>>,
    principal: Principal,
    Path(title_id): Path<i64>,
    Query(query): Query<FeedbackListQuery>,
) -> FeedbackResult<Json<Paginated<ReviewResponse>>>
where
    R: ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let use_case = ReviewUseCase::new(state.repo.clone(), state.config.clone());
    let page = use_case
        .list(&principal, title_id, query.page_params())
        .await?;

    Ok(Json(page.map(|r| ReviewResponse::from(&r))))
}

/// POST /api/v1/titles/{title_id}/reviews
pub async fn create_review<R>(
    State(state): State<FeedbackAppState<R>>,
    principal: Principal,
    Path(title_id): Path<i64>,
    Json(req): Json<ReviewCreateRequest>,
) -> FeedbackResult<(StatusCode, Json<ReviewResponse>)>
where
    R: ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let use_case = ReviewUseCase::new(state.repo.clone(), state.config.clone());
    let review = use_case
        .create(&principal, title_id, &req.text, req.score)
        .await?;

    Ok((StatusCode::CREATED, Json(ReviewResponse::from(&review))))
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn get_review<R>(
    State(state): State<FeedbackAppState<R>>,
    principal: Principal,
    Path((title_id, review_id)): Path<(i64, i64)>,
) -> FeedbackResult<Json<ReviewResponse>>
where
    R: ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let use_case = ReviewUseCase::new(state.repo.clone(), state.config.clone());
    let review = use_case.get(&principal, title_id, review_id).await?;

    Ok(Json(ReviewResponse::from(&review)))
}

/// PATCH /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn update_review<R>(
    State(state): State<FeedbackAppState<R>>,
    principal: Principal,
    Path((title_id, review_id)): Path<(i64, i64)>,
    Json(req): Json<ReviewUpdateRequest>,
) -> FeedbackResult<Json<ReviewResponse>>
where
    R: ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let use_case = ReviewUseCase::new(state.repo.clone(), state.config.clone());
    let review = use_case
        .update(
            &principal,
            title_id,
            review_id,
            req.text.as_deref(),
            req.score,
        )
        .await?;

    Ok(Json(ReviewResponse::from(&review)))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn delete_review<R>(
    State(state): State<FeedbackAppState<R>>,
    principal: Principal,
    Path((title_id, review_id)): Path<(i64, i64)>,
) -> FeedbackResult<StatusCode>
where
    R: ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let use_case = ReviewUseCase::new(state.repo.clone(), state.config.clone());
    use_case.delete(&principal, title_id, review_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Comments
// ============================================================================

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments
pub async fn list_comments<R>(
    State(state): State<FeedbackAppState<R>>,
    principal: Principal,
    Path((title_id, review_id)): Path<(i64, i64)>,
    Query(query): Query<FeedbackListQuery>,
) -> FeedbackResult<Json<Paginated<CommentResponse>>>
where
    R: ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let use_case = CommentUseCase::new(state.repo.clone(), state.config.clone());
    let page = use_case
        .list(&principal, title_id, review_id, query.page_params())
        .await?;

    Ok(Json(page.map(|c| CommentResponse::from(&c))))
}

/// POST /api/v1/titles/{title_id}/reviews/{review_id}/comments
pub async fn create_comment<R>(
    State(state): State<FeedbackAppState<R>>,
    principal: Principal,
    Path((title_id, review_id)): Path<(i64, i64)>,
    Json(req): Json<CommentCreateRequest>,
) -> FeedbackResult<(StatusCode, Json<CommentResponse>)>
where
    R: ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let use_case = CommentUseCase::new(state.repo.clone(), state.config.clone());
    let comment = use_case
        .create(&principal, title_id, review_id, &req.text)
        .await?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(&comment))))
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn get_comment<R>(
    State(state): State<FeedbackAppState<R>>,
    principal: Principal,
    Path((title_id, review_id, comment_id)): Path<(i64, i64, i64)>,
) -> FeedbackResult<Json<CommentResponse>>
where
    R: ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let use_case = CommentUseCase::new(state.repo.clone(), state.config.clone());
    let comment = use_case
        .get(&principal, title_id, review_id, comment_id)
        .await?;

    Ok(Json(CommentResponse::from(&comment)))
}

/// PATCH /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn update_comment<R>(
    State(state): State<FeedbackAppState<R>>,
    principal: Principal,
    Path((title_id, review_id, comment_id)): Path<(i64, i64, i64)>,
    Json(req): Json<CommentUpdateRequest>,
) -> FeedbackResult<Json<CommentResponse>>
where
    R: ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let use_case = CommentUseCase::new(state.repo.clone(), state.config.clone());
    let comment = use_case
        .update(&principal, title_id, review_id, comment_id, &req.text)
        .await?;

    Ok(Json(CommentResponse::from(&comment)))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn delete_comment<R>(
    State(state): State<FeedbackAppState<R>>,
    principal: Principal,
    Path((title_id, review_id, comment_id)): Path<(i64, i64, i64)>,
) -> FeedbackResult<StatusCode>
where
    R: ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let use_case = CommentUseCase::new(state.repo.clone(), state.config.clone());
    use_case
        .delete(&principal, title_id, review_id, comment_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
