//! Request Principal
//!
//! The authenticated user (or anonymous) making a request. The identity
//! middleware resolves the bearer token and inserts a [`Principal`] into the
//! request extensions; handlers extract it from there.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// User role tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum Role {
    #[default]
    User = 0,
    Moderator = 1,
    Admin = 2,
}

impl Role {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use Role::*;
        match self {
            User => "user",
            Moderator => "moderator",
            Admin => "admin",
        }
    }

    #[inline]
    pub fn from_id(id: i16) -> Self {
        use Role::*;
        match id {
            0 => User,
            1 => Moderator,
            2 => Admin,
            _ => unreachable!("Invalid Role id: {}", id),
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use Role::*;
        match code {
            "user" => Some(User),
            "moderator" => Some(Moderator),
            "admin" => Some(Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An authenticated user as seen by the authorization layer.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
    pub role: Role,
    /// Second, independent admin signal (set out-of-band, never via the API)
    pub is_staff: bool,
}

/// The principal attached to every request.
#[derive(Debug, Clone, Default)]
pub enum Principal {
    #[default]
    Anonymous,
    User(AuthUser),
}

impl Principal {
    #[inline]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Principal::User(_))
    }

    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            Principal::User(u) => Some(u),
            Principal::Anonymous => None,
        }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user().map(|u| u.user_id)
    }

    /// Admin capability: explicit admin role OR elevated staff status.
    /// Both signals are honored at every decision point.
    #[inline]
    pub fn is_admin(&self) -> bool {
        match self {
            Principal::User(u) => u.role == Role::Admin || u.is_staff,
            Principal::Anonymous => false,
        }
    }

    #[inline]
    pub fn is_moderator(&self) -> bool {
        match self {
            Principal::User(u) => u.role == Role::Moderator,
            Principal::Anonymous => false,
        }
    }
}

// ============================================================================
// Axum extractor (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl<S> axum::extract::FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        // Anonymous when the authenticate middleware did not run
        Ok(parts.extensions.get::<Principal>().cloned().unwrap_or_default())
    }
}
