//! Refresh Token Use Case

use std::sync::Arc;

use kernel::id::UserId;
use platform::token::{TokenKind, TokenPair};

use crate::application::config::IdentityConfig;
use crate::domain::repository::UserRepository;
use crate::error::{IdentityError, IdentityResult};

/// Refresh token use case
pub struct RefreshTokenUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<IdentityConfig>,
}

impl<R> RefreshTokenUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<IdentityConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, refresh: &str) -> IdentityResult<TokenPair> {
        let user_id = self.config.signer().verify(refresh, TokenKind::Refresh)?;

        // The account must still exist; deleted users cannot refresh.
        let user = self
            .repo
            .find_by_id(&UserId::from_uuid(user_id))
            .await?
            .ok_or(IdentityError::AuthenticationFailed)?;

        Ok(self.config.signer().issue_pair(user.user_id.into_uuid()))
    }
}
