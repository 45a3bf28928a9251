//! Feedback Error Types

use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Feedback-specific result type alias
pub type FeedbackResult<T> = Result<T, FeedbackError>;

/// Feedback-specific error variants
#[derive(Debug, Error)]
pub enum FeedbackError {
    /// No title with the given id
    #[error("Title not found")]
    TitleNotFound,

    /// No such review under the given title
    #[error("Review not found")]
    ReviewNotFound,

    /// No such comment under the given review
    #[error("Comment not found")]
    CommentNotFound,

    /// The author already has a review for this title
    #[error("You have already reviewed this title")]
    DuplicateReview,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Kernel-level error (validation, policy denial), kind preserved
    #[error("{0}")]
    App(#[from] AppError),
}

impl FeedbackError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            FeedbackError::TitleNotFound
            | FeedbackError::ReviewNotFound
            | FeedbackError::CommentNotFound => ErrorKind::NotFound,
            FeedbackError::DuplicateReview => ErrorKind::Conflict,
            FeedbackError::App(err) => err.kind(),
            FeedbackError::Database(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            FeedbackError::Database(e) => {
                tracing::error!(error = %e, "Feedback database error");
            }
            _ => {
                tracing::debug!(error = %self, "Feedback error");
            }
        }
    }
}

impl axum::response::IntoResponse for FeedbackError {
    fn into_response(self) -> axum::response::Response {
        self.log();
        self.to_app_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(FeedbackError::ReviewNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(FeedbackError::DuplicateReview.kind(), ErrorKind::Conflict);
        let err: FeedbackError = AppError::forbidden("not yours").into();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }
}
