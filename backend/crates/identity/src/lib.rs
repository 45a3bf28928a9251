//! Identity - Users and the confirmation-code auth service
//!
//! Clean Architecture structure:
//! - `domain/` - User entity, value objects, repository trait
//! - `application/` - Use cases (request code, exchange code, refresh)
//! - `infra/` - PostgreSQL repository
//! - `presentation/` - HTTP handlers, DTOs, routers, bearer middleware
//!
//! ## Features
//! - Login by email + one-time confirmation code (no passwords stored)
//! - Signed access/refresh token pair bound to the user id
//! - Bearer middleware resolving the request `Principal`
//! - Admin-gated user management plus `/users/me` self access

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::IdentityConfig;
pub use error::{IdentityError, IdentityResult};
pub use infra::postgres::PgUserRepository;
pub use presentation::router::{auth_router, users_router};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}
