//! Exchange Code For Token Use Case
//!
//! Exact match on (email, confirmation_code) or a constant 401 that does
//! not reveal which field was wrong. The code is consumed on success.

use std::sync::Arc;

use platform::token::TokenPair;

use crate::application::config::IdentityConfig;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::Email;
use crate::error::{IdentityError, IdentityResult};

/// Exchange code for token use case
pub struct ObtainTokenUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<IdentityConfig>,
}

impl<R> ObtainTokenUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<IdentityConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, raw_email: &str, code: &str) -> IdentityResult<TokenPair> {
        // A malformed email cannot match any account; collapse into the
        // same generic failure as a wrong code.
        let email =
            Email::new(raw_email).map_err(|_| IdentityError::AuthenticationFailed)?;

        if code.is_empty() {
            return Err(IdentityError::AuthenticationFailed);
        }

        let mut user = self
            .repo
            .find_by_email_and_code(&email, code)
            .await?
            .ok_or(IdentityError::AuthenticationFailed)?;

        // Single use: a successful exchange consumes the code.
        user.clear_code();
        self.repo.update(&user).await?;

        let pair = self.config.signer().issue_pair(user.user_id.into_uuid());

        tracing::info!(user_id = %user.user_id, "Issued token pair");

        Ok(pair)
    }
}
