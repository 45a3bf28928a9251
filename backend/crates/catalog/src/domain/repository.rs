//! Repository Traits
//!
//! Interfaces for catalog persistence. A single Postgres type implements
//! both traits; tests use in-memory implementations.

use crate::domain::entities::{Category, Genre, Title};
use crate::error::CatalogResult;

/// Title listing filter. All fields combine with AND.
#[derive(Debug, Clone, Default)]
pub struct TitleFilter {
    /// Category slug, exact match
    pub category: Option<String>,
    /// Genre slug, exact match (any of the title's genres)
    pub genre: Option<String>,
    /// Case-insensitive name substring
    pub name: Option<String>,
    /// Exact release year
    pub year: Option<i32>,
}

/// Input for title creation. Taxonomy is referenced by slug and resolved
/// by the store; an unresolved slug is a not-found error.
#[derive(Debug, Clone)]
pub struct NewTitle {
    pub name: String,
    pub year: i32,
    pub description: String,
    pub category_slug: Option<String>,
    pub genre_slugs: Vec<String>,
}

/// Partial title update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct TitlePatch {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category_slug: Option<String>,
    /// Replaces the full genre set when present
    pub genre_slugs: Option<Vec<String>>,
}

/// Categories and genres
#[trait_variant::make(TaxonomyRepository: Send)]
pub trait LocalTaxonomyRepository {
    async fn list_categories(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> CatalogResult<Vec<Category>>;

    async fn count_categories(&self, search: Option<&str>) -> CatalogResult<i64>;

    async fn create_category(&self, name: &str, slug: &str) -> CatalogResult<Category>;

    /// Delete by slug. Titles keep existing with a null category.
    async fn delete_category(&self, slug: &str) -> CatalogResult<()>;

    async fn list_genres(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> CatalogResult<Vec<Genre>>;

    async fn count_genres(&self, search: Option<&str>) -> CatalogResult<i64>;

    async fn create_genre(&self, name: &str, slug: &str) -> CatalogResult<Genre>;

    /// Delete by slug. Join rows cascade; titles themselves survive.
    async fn delete_genre(&self, slug: &str) -> CatalogResult<()>;
}

/// Titles with rating aggregation
#[trait_variant::make(TitleRepository: Send)]
pub trait LocalTitleRepository {
    /// Filtered page ordered by rating ascending (unrated titles last).
    async fn list_titles(
        &self,
        filter: &TitleFilter,
        limit: i64,
        offset: i64,
    ) -> CatalogResult<Vec<Title>>;

    async fn count_titles(&self, filter: &TitleFilter) -> CatalogResult<i64>;

    async fn find_title(&self, title_id: i64) -> CatalogResult<Option<Title>>;

    async fn create_title(&self, input: &NewTitle) -> CatalogResult<Title>;

    async fn update_title(&self, title_id: i64, patch: &TitlePatch) -> CatalogResult<Title>;

    async fn delete_title(&self, title_id: i64) -> CatalogResult<()>;
}
