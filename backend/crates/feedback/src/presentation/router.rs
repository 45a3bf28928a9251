//! Feedback Router

use axum::{Router, routing::get};
use std::sync::Arc;

use crate::application::config::FeedbackConfig;
use crate::domain::repository::{CommentRepository, ReviewRepository};
use crate::infra::postgres::PgFeedbackRepository;
use crate::presentation::handlers::{self, FeedbackAppState};

/// Create the feedback router with the PostgreSQL repository
pub fn feedback_router(repo: PgFeedbackRepository, config: Arc<FeedbackConfig>) -> Router {
    feedback_router_generic(repo, config)
}

/// Create a generic feedback router for any repository implementation
pub fn feedback_router_generic<R>(repo: R, config: Arc<FeedbackConfig>) -> Router
where
    R: ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let state = FeedbackAppState {
        repo: Arc::new(repo),
        config,
    };

    Router::new()
        .route(
            "/titles/{title_id}/reviews",
            get(handlers::list_reviews::<R>).post(handlers::create_review::<R>),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}",
            get(handlers::get_review::<R>)
                .patch(handlers::update_review::<R>)
                .delete(handlers::delete_review::<R>),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments",
            get(handlers::list_comments::<R>).post(handlers::create_comment::<R>),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments/{comment_id}",
            get(handlers::get_comment::<R>)
                .patch(handlers::update_comment::<R>)
                .delete(handlers::delete_comment::<R>),
        )
        .with_state(state)
}
