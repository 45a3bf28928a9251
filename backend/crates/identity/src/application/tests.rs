//! Use-case tests over an in-memory repository.

use std::sync::{Arc, Mutex};

use platform::mailer::{MailError, Mailer};
use platform::token::TokenKind;

use crate::application::config::IdentityConfig;
use crate::application::{ObtainTokenUseCase, RefreshTokenUseCase, RequestCodeUseCase};
use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::Email;
use crate::error::{IdentityError, IdentityResult};
use kernel::id::UserId;

#[derive(Clone, Default)]
struct InMemoryUserRepository {
    users: Arc<Mutex<Vec<User>>>,
}

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> IdentityResult<()> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(IdentityError::EmailTaken);
        }
        if users.iter().any(|u| u.username == user.username) {
            return Err(IdentityError::UsernameTaken);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> IdentityResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| &u.user_id == user_id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> IdentityResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| &u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> IdentityResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.username.as_str() == username).cloned())
    }

    async fn find_by_email_and_code(
        &self,
        email: &Email,
        code: &str,
    ) -> IdentityResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| {
                &u.email == email
                    && u.confirmation_code
                        .as_ref()
                        .is_some_and(|c| c.as_str() == code)
            })
            .cloned())
    }

    async fn update(&self, user: &User) -> IdentityResult<()> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.user_id == user.user_id) {
            Some(slot) => {
                *slot = user.clone();
                Ok(())
            }
            None => Err(IdentityError::UserNotFound),
        }
    }

    async fn delete(&self, user_id: &UserId) -> IdentityResult<()> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| &u.user_id != user_id);
        if users.len() == before {
            return Err(IdentityError::UserNotFound);
        }
        Ok(())
    }

    async fn list(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> IdentityResult<Vec<User>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .filter(|u| match search {
                Some(s) => u
                    .username
                    .as_str()
                    .to_lowercase()
                    .contains(&s.to_lowercase()),
                None => true,
            })
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, search: Option<&str>) -> IdentityResult<i64> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .filter(|u| match search {
                Some(s) => u
                    .username
                    .as_str()
                    .to_lowercase()
                    .contains(&s.to_lowercase()),
                None => true,
            })
            .count() as i64)
    }
}

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<(String, String, String)>>,
    fail: bool,
}

impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        if self.fail {
            return Err(MailError::Transport("smtp down".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}

fn setup() -> (
    Arc<InMemoryUserRepository>,
    Arc<RecordingMailer>,
    Arc<IdentityConfig>,
) {
    (
        Arc::new(InMemoryUserRepository::default()),
        Arc::new(RecordingMailer::default()),
        Arc::new(IdentityConfig::with_random_secret()),
    )
}

fn code_for(repo: &InMemoryUserRepository, email: &str) -> String {
    let users = repo.users.lock().unwrap();
    users
        .iter()
        .find(|u| u.email.as_str() == email)
        .and_then(|u| u.confirmation_code.as_ref())
        .map(|c| c.as_str().to_string())
        .unwrap()
}

#[tokio::test]
async fn test_request_code_creates_user_and_sends_mail() {
    let (repo, mailer, config) = setup();
    let use_case = RequestCodeUseCase::new(repo.clone(), mailer.clone(), config);

    use_case.execute("reader@example.com").await.unwrap();

    assert_eq!(repo.users.lock().unwrap().len(), 1);
    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "reader@example.com");
    assert!(sent[0].2.contains(&code_for(&repo, "reader@example.com")));
}

#[tokio::test]
async fn test_request_code_rejects_malformed_email() {
    let (repo, mailer, config) = setup();
    let use_case = RequestCodeUseCase::new(repo.clone(), mailer, config);

    let err = use_case.execute("not-an-email").await.unwrap_err();
    assert!(matches!(err, IdentityError::App(_)));
    assert!(repo.users.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_request_code_delivery_failure_surfaces() {
    let (repo, _, config) = setup();
    let mailer = Arc::new(RecordingMailer {
        fail: true,
        ..Default::default()
    });
    let use_case = RequestCodeUseCase::new(repo, mailer, config);

    let err = use_case.execute("reader@example.com").await.unwrap_err();
    assert!(matches!(err, IdentityError::Delivery(_)));
}

#[tokio::test]
async fn test_exchange_issues_pair_and_consumes_code() {
    let (repo, mailer, config) = setup();
    let request = RequestCodeUseCase::new(repo.clone(), mailer, config.clone());
    request.execute("reader@example.com").await.unwrap();

    let code = code_for(&repo, "reader@example.com");
    let obtain = ObtainTokenUseCase::new(repo.clone(), config.clone());

    let pair = obtain.execute("reader@example.com", &code).await.unwrap();
    config
        .signer()
        .verify(&pair.access, TokenKind::Access)
        .unwrap();

    // Single use: the same code cannot be exchanged twice.
    let err = obtain.execute("reader@example.com", &code).await.unwrap_err();
    assert!(matches!(err, IdentityError::AuthenticationFailed));
}

#[tokio::test]
async fn test_exchange_rejects_wrong_code() {
    let (repo, mailer, config) = setup();
    let request = RequestCodeUseCase::new(repo.clone(), mailer, config.clone());
    request.execute("reader@example.com").await.unwrap();

    let obtain = ObtainTokenUseCase::new(repo, config);
    let err = obtain
        .execute("reader@example.com", "definitely-wrong")
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityError::AuthenticationFailed));
}

#[tokio::test]
async fn test_fresh_code_supersedes_previous_one() {
    let (repo, mailer, config) = setup();
    let request = RequestCodeUseCase::new(repo.clone(), mailer, config.clone());

    request.execute("reader@example.com").await.unwrap();
    let old_code = code_for(&repo, "reader@example.com");

    request.execute("reader@example.com").await.unwrap();
    let new_code = code_for(&repo, "reader@example.com");
    assert_ne!(old_code, new_code);

    // One user, two requests.
    assert_eq!(repo.users.lock().unwrap().len(), 1);

    let obtain = ObtainTokenUseCase::new(repo, config);
    let err = obtain
        .execute("reader@example.com", &old_code)
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityError::AuthenticationFailed));
    obtain
        .execute("reader@example.com", &new_code)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_refresh_rotates_pair() {
    let (repo, mailer, config) = setup();
    let request = RequestCodeUseCase::new(repo.clone(), mailer, config.clone());
    request.execute("reader@example.com").await.unwrap();
    let code = code_for(&repo, "reader@example.com");

    let obtain = ObtainTokenUseCase::new(repo.clone(), config.clone());
    let pair = obtain.execute("reader@example.com", &code).await.unwrap();

    let refresh = RefreshTokenUseCase::new(repo, config.clone());
    let fresh = refresh.execute(&pair.refresh).await.unwrap();
    config
        .signer()
        .verify(&fresh.access, TokenKind::Access)
        .unwrap();
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let (repo, mailer, config) = setup();
    let request = RequestCodeUseCase::new(repo.clone(), mailer, config.clone());
    request.execute("reader@example.com").await.unwrap();
    let code = code_for(&repo, "reader@example.com");

    let obtain = ObtainTokenUseCase::new(repo.clone(), config.clone());
    let pair = obtain.execute("reader@example.com", &code).await.unwrap();

    let refresh = RefreshTokenUseCase::new(repo, config);
    let err = refresh.execute(&pair.access).await.unwrap_err();
    assert!(matches!(err, IdentityError::AuthenticationFailed));
}

#[tokio::test]
async fn test_refresh_rejects_deleted_user() {
    let (repo, mailer, config) = setup();
    let request = RequestCodeUseCase::new(repo.clone(), mailer, config.clone());
    request.execute("reader@example.com").await.unwrap();
    let code = code_for(&repo, "reader@example.com");

    let obtain = ObtainTokenUseCase::new(repo.clone(), config.clone());
    let pair = obtain.execute("reader@example.com", &code).await.unwrap();

    let user_id = repo.users.lock().unwrap()[0].user_id;
    repo.delete(&user_id).await.unwrap();

    let refresh = RefreshTokenUseCase::new(repo, config);
    let err = refresh.execute(&pair.refresh).await.unwrap_err();
    assert!(matches!(err, IdentityError::AuthenticationFailed));
}
