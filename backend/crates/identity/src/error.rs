//! Identity Error Types
//!
//! Identity-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::mailer::MailError;
use platform::token::TokenError;
use thiserror::Error;

/// Identity-specific result type alias
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Identity-specific error variants
#[derive(Debug, Error)]
pub enum IdentityError {
    /// User not found
    #[error("User not found")]
    UserNotFound,

    /// Email already registered to another user
    #[error("Email already in use")]
    EmailTaken,

    /// Username already registered to another user
    #[error("Username already in use")]
    UsernameTaken,

    /// Credentials did not match. The message is deliberately constant:
    /// it never reveals which of email/code was wrong.
    #[error("No active account found with the given credentials")]
    AuthenticationFailed,

    /// Mail transport reported a failure
    #[error("Failed to send confirmation code")]
    Delivery(#[source] MailError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Kernel-level error (validation, policy denial), kind preserved
    #[error("{0}")]
    App(#[from] AppError),
}

impl IdentityError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            IdentityError::UserNotFound => ErrorKind::NotFound,
            IdentityError::EmailTaken | IdentityError::UsernameTaken => ErrorKind::Conflict,
            IdentityError::AuthenticationFailed => ErrorKind::Unauthorized,
            IdentityError::Delivery(_) => ErrorKind::InternalServerError,
            IdentityError::App(err) => err.kind(),
            IdentityError::Database(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            IdentityError::Database(e) => {
                tracing::error!(error = %e, "Identity database error");
            }
            IdentityError::Delivery(e) => {
                tracing::error!(error = %e, "Confirmation code delivery failed");
            }
            IdentityError::AuthenticationFailed => {
                tracing::warn!("Failed credential exchange");
            }
            _ => {
                tracing::debug!(error = %self, "Identity error");
            }
        }
    }
}

impl axum::response::IntoResponse for IdentityError {
    fn into_response(self) -> axum::response::Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<TokenError> for IdentityError {
    fn from(_: TokenError) -> Self {
        // Token failures all collapse into the generic 401
        IdentityError::AuthenticationFailed
    }
}
