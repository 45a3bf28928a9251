//! User Entity

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use kernel::principal::{AuthUser, Role};

use crate::domain::value_object::{ConfirmationCode, Email, Username};

/// User entity
///
/// Created implicitly on the first confirmation-code request, or explicitly
/// by an admin. Never deleted by the auth flow itself.
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Unique, used for login
    pub email: Email,
    /// Unique, used in URLs
    pub username: Username,
    pub role: Role,
    /// Second admin signal, set out-of-band and never via the API
    pub is_staff: bool,
    pub bio: String,
    pub first_name: String,
    pub last_name: String,
    /// Outstanding one-time login code, if any
    pub confirmation_code: Option<ConfirmationCode>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a user implicitly from a confirmation-code request.
    /// The username is a generated placeholder the user can change later.
    pub fn register(email: Email, code: ConfirmationCode) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            email,
            username: Username::placeholder(),
            role: Role::default(),
            is_staff: false,
            bio: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            confirmation_code: Some(code),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a user explicitly (admin path). No outstanding code.
    pub fn create(email: Email, username: Username, role: Role) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            email,
            username,
            role,
            is_staff: false,
            bio: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            confirmation_code: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace any outstanding code with a fresh one (last write wins).
    pub fn issue_code(&mut self) -> ConfirmationCode {
        let code = ConfirmationCode::generate();
        self.confirmation_code = Some(code.clone());
        self.updated_at = Utc::now();
        code
    }

    /// Consume the outstanding code after a successful exchange.
    pub fn clear_code(&mut self) {
        self.confirmation_code = None;
        self.updated_at = Utc::now();
    }

    pub fn set_role(&mut self, role: Role) {
        self.role = role;
        self.updated_at = Utc::now();
    }

    pub fn set_email(&mut self, email: Email) {
        self.email = email;
        self.updated_at = Utc::now();
    }

    pub fn set_username(&mut self, username: Username) {
        self.username = username;
        self.updated_at = Utc::now();
    }

    pub fn set_profile(
        &mut self,
        bio: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
    ) {
        if let Some(bio) = bio {
            self.bio = bio;
        }
        if let Some(first_name) = first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = last_name {
            self.last_name = last_name;
        }
        self.updated_at = Utc::now();
    }

    /// Authorization-layer view of this user.
    pub fn as_auth_user(&self) -> AuthUser {
        AuthUser {
            user_id: self.user_id.into_uuid(),
            username: self.username.as_str().to_string(),
            role: self.role,
            is_staff: self.is_staff,
        }
    }
}
