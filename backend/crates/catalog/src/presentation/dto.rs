//! API DTOs (Data Transfer Objects)

use kernel::page::PageParams;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Category, Genre, Title};
use crate::domain::repository::{NewTitle, TitleFilter, TitlePatch};

// ============================================================================
// Taxonomy
// ============================================================================

/// Category representation
#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    pub name: String,
    pub slug: String,
}

impl From<&Category> for CategoryResponse {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            slug: category.slug.as_str().to_string(),
        }
    }
}

/// Genre representation
#[derive(Debug, Clone, Serialize)]
pub struct GenreResponse {
    pub name: String,
    pub slug: String,
}

impl From<&Genre> for GenreResponse {
    fn from(genre: &Genre) -> Self {
        Self {
            name: genre.name.clone(),
            slug: genre.slug.as_str().to_string(),
        }
    }
}

/// Category / genre creation request
#[derive(Debug, Clone, Deserialize)]
pub struct TaxonomyCreateRequest {
    pub name: String,
    pub slug: String,
}

/// Taxonomy list query string
#[derive(Debug, Clone, Deserialize)]
pub struct TaxonomyListQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
}

impl TaxonomyListQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams::new(self.page.unwrap_or(1))
    }
}

// ============================================================================
// Titles
// ============================================================================

/// Title representation with aggregated rating
#[derive(Debug, Clone, Serialize)]
pub struct TitleResponse {
    pub id: i64,
    pub name: String,
    pub year: i32,
    /// Mean review score; null until the first review lands
    pub rating: Option<f64>,
    pub description: String,
    pub genre: Vec<GenreResponse>,
    pub category: Option<CategoryResponse>,
}

impl From<&Title> for TitleResponse {
    fn from(title: &Title) -> Self {
        Self {
            id: title.title_id,
            name: title.name.clone(),
            year: title.year,
            rating: title.rating,
            description: title.description.clone(),
            genre: title.genres.iter().map(GenreResponse::from).collect(),
            category: title.category.as_ref().map(CategoryResponse::from),
        }
    }
}

/// Title creation request. Taxonomy is referenced by slug.
#[derive(Debug, Clone, Deserialize)]
pub struct TitleCreateRequest {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    #[serde(default)]
    pub genre: Vec<String>,
    pub category: Option<String>,
}

impl From<TitleCreateRequest> for NewTitle {
    fn from(req: TitleCreateRequest) -> Self {
        Self {
            name: req.name,
            year: req.year,
            description: req.description.unwrap_or_default(),
            category_slug: req.category,
            genre_slugs: req.genre,
        }
    }
}

/// Partial title update request
#[derive(Debug, Clone, Deserialize)]
pub struct TitleUpdateRequest {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub genre: Option<Vec<String>>,
    pub category: Option<String>,
}

impl From<TitleUpdateRequest> for TitlePatch {
    fn from(req: TitleUpdateRequest) -> Self {
        Self {
            name: req.name,
            year: req.year,
            description: req.description,
            category_slug: req.category,
            genre_slugs: req.genre,
        }
    }
}

/// Title list query string
#[derive(Debug, Clone, Deserialize)]
pub struct TitleListQuery {
    pub category: Option<String>,
    pub genre: Option<String>,
    pub name: Option<String>,
    pub year: Option<i32>,
    pub page: Option<u32>,
}

impl TitleListQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams::new(self.page.unwrap_or(1))
    }

    pub fn filter(&self) -> TitleFilter {
        TitleFilter {
            category: self.category.clone(),
            genre: self.genre.clone(),
            name: self.name.clone(),
            year: self.year,
        }
    }
}
