//! Catalog Error Types

use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Catalog-specific result type alias
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog-specific error variants
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No category with the given slug
    #[error("Category not found")]
    CategoryNotFound,

    /// No genre with the given slug
    #[error("Genre not found")]
    GenreNotFound,

    /// No title with the given id
    #[error("Title not found")]
    TitleNotFound,

    /// Slug already in use within the same taxonomy
    #[error("Slug already in use")]
    SlugTaken,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Kernel-level error (validation, policy denial), kind preserved
    #[error("{0}")]
    App(#[from] AppError),
}

impl CatalogError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::CategoryNotFound
            | CatalogError::GenreNotFound
            | CatalogError::TitleNotFound => ErrorKind::NotFound,
            CatalogError::SlugTaken => ErrorKind::Conflict,
            CatalogError::App(err) => err.kind(),
            CatalogError::Database(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            CatalogError::Database(e) => {
                tracing::error!(error = %e, "Catalog database error");
            }
            _ => {
                tracing::debug!(error = %self, "Catalog error");
            }
        }
    }
}

impl axum::response::IntoResponse for CatalogError {
    fn into_response(self) -> axum::response::Response {
        self.log();
        self.to_app_error().into_response()
    }
}
