//! Catalog Value Objects

use chrono::{Datelike, Utc};
use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_SLUG_LENGTH: usize = 200;
const MAX_NAME_LENGTH: usize = 200;

/// URL-safe identifier for a category or genre
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    pub fn new(slug: impl Into<String>) -> AppResult<Self> {
        let slug = slug.into();

        if slug.is_empty() {
            return Err(AppError::bad_request("Slug cannot be empty"));
        }
        if slug.len() > MAX_SLUG_LENGTH {
            return Err(AppError::bad_request(format!(
                "Slug cannot exceed {} characters",
                MAX_SLUG_LENGTH
            )));
        }
        if !slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        {
            return Err(AppError::bad_request(
                "Slug may only contain lowercase letters, digits, '-' and '_'",
            ));
        }

        Ok(Self(slug))
    }

    /// Construct from a trusted source (database row)
    pub fn from_db(slug: String) -> Self {
        Self(slug)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validate a display name for a category, genre, or title.
pub fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::bad_request("Name cannot be empty"));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(AppError::bad_request(format!(
            "Name cannot exceed {} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

/// A release year must not lie in the future.
pub fn validate_year(year: i32) -> AppResult<()> {
    let current = Utc::now().year();
    if year > current {
        return Err(AppError::bad_request(format!(
            "Year cannot be later than {}",
            current
        )));
    }
    Ok(())
}
