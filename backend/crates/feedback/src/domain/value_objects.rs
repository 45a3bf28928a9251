//! Feedback Value Objects

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_SCORE: i16 = 1;
pub const MAX_SCORE: i16 = 10;
pub const DEFAULT_SCORE: i16 = 5;

/// Review score in [1, 10]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(i16);

impl Score {
    pub fn new(score: i16) -> AppResult<Self> {
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(AppError::bad_request(format!(
                "Score must be between {} and {}",
                MIN_SCORE, MAX_SCORE
            )));
        }
        Ok(Self(score))
    }

    /// Construct from a trusted source (database row)
    pub fn from_db(score: i16) -> Self {
        Self(score)
    }

    pub fn value(&self) -> i16 {
        self.0
    }
}

impl Default for Score {
    fn default() -> Self {
        Self(DEFAULT_SCORE)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A review or comment body must not be empty.
pub fn validate_text(text: &str) -> AppResult<()> {
    if text.trim().is_empty() {
        return Err(AppError::bad_request("Text cannot be empty"));
    }
    Ok(())
}
