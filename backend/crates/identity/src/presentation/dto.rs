//! API DTOs (Data Transfer Objects)
//!
//! Field names follow the wire format (snake_case, serde default).

use kernel::page::PageParams;
use platform::token::TokenPair;
use serde::{Deserialize, Serialize};

use crate::domain::entity::User;

// ============================================================================
// Auth
// ============================================================================

/// Confirmation-code request
#[derive(Debug, Clone, Deserialize)]
pub struct SendCodeRequest {
    pub email: String,
}

/// Confirmation-code response
#[derive(Debug, Clone, Serialize)]
pub struct SendCodeResponse {
    pub message: String,
}

/// Code-for-token exchange request
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRequest {
    pub email: String,
    #[serde(default)]
    pub confirmation_code: String,
}

/// Token pair response
#[derive(Debug, Clone, Serialize)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

impl From<TokenPair> for TokenPairResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access: pair.access,
            refresh: pair.refresh,
        }
    }
}

/// Token refresh request
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

// ============================================================================
// Users
// ============================================================================

/// User representation returned by every user endpoint
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub role: String,
    pub bio: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            role: user.role.code().to_string(),
            bio: user.bio.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

/// Admin user creation request
#[derive(Debug, Clone, Deserialize)]
pub struct UserCreateRequest {
    pub email: String,
    pub username: String,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Admin user update request (may change role)
#[derive(Debug, Clone, Deserialize)]
pub struct UserUpdateRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Self-service profile update. Deliberately has no `role` field: a user
/// cannot escalate their own role.
#[derive(Debug, Clone, Deserialize)]
pub struct MeUpdateRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// User list query string
#[derive(Debug, Clone, Deserialize)]
pub struct UserListQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
}

impl UserListQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams::new(self.page.unwrap_or(1))
    }
}
