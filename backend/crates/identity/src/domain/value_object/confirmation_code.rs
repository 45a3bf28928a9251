//! Confirmation Code Value Object
//!
//! Single-use, regenerable secret exchanged for a token pair in lieu of a
//! password. A fresh request always supersedes the outstanding code.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One-time confirmation code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationCode(String);

impl ConfirmationCode {
    /// Generate a fresh random code
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from database value
    pub fn from_db(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConfirmationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
