//! Catalog Entities

use crate::domain::value_objects::Slug;

/// Category - a title belongs to at most one
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub category_id: i64,
    pub name: String,
    pub slug: Slug,
}

/// Genre - a title carries any number
#[derive(Debug, Clone, PartialEq)]
pub struct Genre {
    pub genre_id: i64,
    pub name: String,
    pub slug: Slug,
}

/// Title with its taxonomy and aggregated rating
///
/// `rating` is the mean review score, absent until the first review lands.
/// It is computed by the store at read time and never persisted.
#[derive(Debug, Clone)]
pub struct Title {
    pub title_id: i64,
    pub name: String,
    pub year: i32,
    pub description: String,
    pub category: Option<Category>,
    pub genres: Vec<Genre>,
    pub rating: Option<f64>,
}
