//! Request Confirmation Code Use Case
//!
//! Creates the user implicitly on first contact, regenerates the code on
//! every subsequent request (last write wins), and hands the code to the
//! mail transport.

use std::sync::Arc;

use platform::mailer::Mailer;

use crate::application::config::IdentityConfig;
use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{ConfirmationCode, Email};
use crate::error::{IdentityError, IdentityResult};

const MAIL_SUBJECT: &str = "Registration confirmation";

/// Request confirmation code use case
pub struct RequestCodeUseCase<R, M>
where
    R: UserRepository,
    M: Mailer,
{
    repo: Arc<R>,
    mailer: Arc<M>,
    config: Arc<IdentityConfig>,
}

impl<R, M> RequestCodeUseCase<R, M>
where
    R: UserRepository,
    M: Mailer,
{
    pub fn new(repo: Arc<R>, mailer: Arc<M>, config: Arc<IdentityConfig>) -> Self {
        Self {
            repo,
            mailer,
            config,
        }
    }

    pub async fn execute(&self, raw_email: &str) -> IdentityResult<()> {
        let email = Email::new(raw_email)?;

        let code = match self.repo.find_by_email(&email).await? {
            Some(mut user) => {
                let code = user.issue_code();
                self.repo.update(&user).await?;
                code
            }
            None => {
                let code = ConfirmationCode::generate();
                let user = User::register(email.clone(), code.clone());
                self.repo.create(&user).await?;

                tracing::info!(
                    user_id = %user.user_id,
                    "User created implicitly from confirmation-code request"
                );
                code
            }
        };

        self.mailer
            .send(
                email.as_str(),
                MAIL_SUBJECT,
                &format!("Your confirmation code: {}", code),
            )
            .await
            .map_err(IdentityError::Delivery)?;

        tracing::info!(
            email = %email,
            from = %self.config.from_email,
            "Confirmation code sent"
        );

        Ok(())
    }
}
