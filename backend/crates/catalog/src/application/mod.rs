//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod taxonomy;
pub mod titles;

#[cfg(test)]
mod tests;

// Re-exports
pub use config::CatalogConfig;
pub use taxonomy::TaxonomyUseCase;
pub use titles::TitleUseCase;
