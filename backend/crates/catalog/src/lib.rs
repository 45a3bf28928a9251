//! Catalog - Categories, genres, and titles
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, slug value object, repository traits
//! - `application/` - Use cases (taxonomy management, title CRUD + listing)
//! - `infra/` - PostgreSQL repository
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Titles carry an aggregated `rating` (mean review score), absent until
//!   the first review lands
//! - Title listing filters by category/genre slug, name substring, and year
//! - Writes are admin-only; reads are open to anyone

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::CatalogConfig;
pub use error::{CatalogError, CatalogResult};
pub use infra::postgres::PgCatalogRepository;
pub use presentation::router::catalog_router;

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}
