//! Repository Trait
//!
//! Interface for user persistence. Implementation is in the infrastructure
//! layer; tests use an in-memory implementation.

use crate::domain::entity::User;
use crate::domain::value_object::Email;
use crate::error::IdentityResult;
use kernel::id::UserId;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    async fn create(&self, user: &User) -> IdentityResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> IdentityResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &Email) -> IdentityResult<Option<User>>;

    /// Find user by username
    async fn find_by_username(&self, username: &str) -> IdentityResult<Option<User>>;

    /// Exact match on both fields; used by the code-for-token exchange
    async fn find_by_email_and_code(
        &self,
        email: &Email,
        code: &str,
    ) -> IdentityResult<Option<User>>;

    /// Update user
    async fn update(&self, user: &User) -> IdentityResult<()>;

    /// Delete user (admin operation; reviews and comments cascade)
    async fn delete(&self, user_id: &UserId) -> IdentityResult<()>;

    /// List users, optionally filtered by username substring
    async fn list(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> IdentityResult<Vec<User>>;

    /// Count users matching the same filter as `list`
    async fn count(&self, search: Option<&str>) -> IdentityResult<i64>;
}
