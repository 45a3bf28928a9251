//! Username Value Object
//!
//! Unique user handle used in URLs (`/users/{username}`). Users created
//! implicitly by the confirmation-code flow get a generated placeholder.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const USERNAME_MAX_LENGTH: usize = 150;

/// Username value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Create a new username with validation
    pub fn new(username: impl Into<String>) -> AppResult<Self> {
        let username = username.into().trim().to_string();

        if username.is_empty() {
            return Err(AppError::bad_request("Username is required"));
        }

        if username.len() > USERNAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Username must be at most {} characters",
                USERNAME_MAX_LENGTH
            )));
        }

        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '@' | '+' | '-' | '_'))
        {
            return Err(AppError::bad_request(
                "Username may contain only letters, digits and .@+-_",
            ));
        }

        // "me" is reserved by the self-access route
        if username == "me" {
            return Err(AppError::bad_request("This username is reserved"));
        }

        Ok(Self(username))
    }

    /// Generated placeholder for users created implicitly by the
    /// confirmation-code flow.
    pub fn placeholder() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(username: impl Into<String>) -> Self {
        Self(username.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_valid() {
        assert!(Username::new("reader_01").is_ok());
        assert!(Username::new("reader.name").is_ok());
        assert!(Username::new("reader+tag@host").is_ok());
    }

    #[test]
    fn test_username_invalid() {
        assert!(Username::new("").is_err());
        assert!(Username::new("   ").is_err());
        assert!(Username::new("reader name").is_err());
        assert!(Username::new("reader!").is_err());
        assert!(Username::new("a".repeat(151)).is_err());
    }

    #[test]
    fn test_me_is_reserved() {
        assert!(Username::new("me").is_err());
    }

    #[test]
    fn test_placeholder_is_valid() {
        let placeholder = Username::placeholder();
        assert!(Username::new(placeholder.as_str()).is_ok());
    }

    #[test]
    fn test_placeholders_are_unique() {
        assert_ne!(Username::placeholder(), Username::placeholder());
    }
}
