//! HTTP Handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use std::sync::Arc;

use kernel::extract::Json;
use kernel::page::Paginated;
use kernel::policy::{self, Action, Relation, Resource};
use kernel::principal::{Principal, Role};

use platform::mailer::Mailer;

use crate::application::config::IdentityConfig;
use crate::application::{ObtainTokenUseCase, RefreshTokenUseCase, RequestCodeUseCase};
use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, Username};
use crate::error::{IdentityError, IdentityResult};
use crate::presentation::dto::{
    MeUpdateRequest, RefreshRequest, SendCodeRequest, SendCodeResponse, TokenPairResponse,
    TokenRequest, UserCreateRequest, UserListQuery, UserResponse, UserUpdateRequest,
};
use kernel::error::app_error::AppError;

/// Shared state for auth handlers
pub struct AuthAppState<R, M>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub mailer: Arc<M>,
    pub config: Arc<IdentityConfig>,
}

impl<R, M> Clone for AuthAppState<R, M>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            mailer: Arc::clone(&self.mailer),
            config: Arc::clone(&self.config),
        }
    }
}

/// Shared state for user handlers
#[derive(Clone)]
pub struct UsersAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<IdentityConfig>,
}

// ============================================================================
// Auth
// ============================================================================

/// POST /api/v1/auth/email
pub async fn send_code<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<SendCodeRequest>,
) -> IdentityResult<Json<SendCodeResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = RequestCodeUseCase::new(
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    use_case.execute(&req.email).await?;

    Ok(Json(SendCodeResponse {
        message: "Confirmation code sent".to_string(),
    }))
}

/// POST /api/v1/auth/token
pub async fn obtain_token<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<TokenRequest>,
) -> IdentityResult<Json<TokenPairResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = ObtainTokenUseCase::new(state.repo.clone(), state.config.clone());

    let pair = use_case.execute(&req.email, &req.confirmation_code).await?;

    Ok(Json(pair.into()))
}

/// POST /api/v1/auth/token/refresh
pub async fn refresh_token<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<RefreshRequest>,
) -> IdentityResult<Json<TokenPairResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = RefreshTokenUseCase::new(state.repo.clone(), state.config.clone());

    let pair = use_case.execute(&req.refresh).await?;

    Ok(Json(pair.into()))
}

// ============================================================================
// User administration (admin-gated via policy)
// ============================================================================

/// GET /api/v1/users
pub async fn list_users<R>(
    State(state): State<UsersAppState<R>>,
    principal: Principal,
    Query(query): Query<UserListQuery>,
) -> IdentityResult<Json<Paginated<UserResponse>>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    policy::authorize(&principal, Action::List, Resource::User, Relation::None)?;

    let params = query.page_params();
    let page_size = state.config.page_size;
    let search = query.search.as_deref();

    let count = state.repo.count(search).await?;
    let users = state
        .repo
        .list(search, params.limit(page_size), params.offset(page_size))
        .await?;

    let results = users.iter().map(UserResponse::from).collect();
    Ok(Json(Paginated::new(count, params, page_size, results)))
}

/// POST /api/v1/users
pub async fn create_user<R>(
    State(state): State<UsersAppState<R>>,
    principal: Principal,
    Json(req): Json<UserCreateRequest>,
) -> IdentityResult<(StatusCode, Json<UserResponse>)>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    policy::authorize(&principal, Action::Create, Resource::User, Relation::None)?;

    let email = Email::new(&req.email)?;
    let username = Username::new(&req.username)?;
    let role = parse_role(req.role.as_deref())?.unwrap_or_default();

    let mut user = User::create(email, username, role);
    user.set_profile(req.bio, req.first_name, req.last_name);

    state.repo.create(&user).await?;

    tracing::info!(user_id = %user.user_id, "User created by admin");

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// GET /api/v1/users/{username}
pub async fn get_user<R>(
    State(state): State<UsersAppState<R>>,
    principal: Principal,
    Path(username): Path<String>,
) -> IdentityResult<Json<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    policy::authorize(&principal, Action::Retrieve, Resource::User, Relation::None)?;

    let user = state
        .repo
        .find_by_username(&username)
        .await?
        .ok_or(IdentityError::UserNotFound)?;

    Ok(Json(UserResponse::from(&user)))
}

/// PATCH /api/v1/users/{username}
pub async fn update_user<R>(
    State(state): State<UsersAppState<R>>,
    principal: Principal,
    Path(username): Path<String>,
    Json(req): Json<UserUpdateRequest>,
) -> IdentityResult<Json<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    policy::authorize(&principal, Action::Update, Resource::User, Relation::None)?;

    let mut user = state
        .repo
        .find_by_username(&username)
        .await?
        .ok_or(IdentityError::UserNotFound)?;

    apply_profile_update(
        &mut user,
        req.email,
        req.username,
        req.bio,
        req.first_name,
        req.last_name,
    )?;
    if let Some(role) = parse_role(req.role.as_deref())? {
        user.set_role(role);
    }

    state.repo.update(&user).await?;

    tracing::info!(user_id = %user.user_id, "User updated by admin");

    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /api/v1/users/{username}
pub async fn delete_user<R>(
    State(state): State<UsersAppState<R>>,
    principal: Principal,
    Path(username): Path<String>,
) -> IdentityResult<StatusCode>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    policy::authorize(&principal, Action::Delete, Resource::User, Relation::None)?;

    let user = state
        .repo
        .find_by_username(&username)
        .await?
        .ok_or(IdentityError::UserNotFound)?;

    state.repo.delete(&user.user_id).await?;

    tracing::info!(user_id = %user.user_id, "User deleted by admin");

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Self access
// ============================================================================

/// GET /api/v1/users/me
pub async fn get_me<R>(
    State(state): State<UsersAppState<R>>,
    principal: Principal,
) -> IdentityResult<Json<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let user = load_self(&state, &principal).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// PATCH /api/v1/users/me
///
/// The request DTO has no role field, so this can never change a role.
pub async fn update_me<R>(
    State(state): State<UsersAppState<R>>,
    principal: Principal,
    Json(req): Json<MeUpdateRequest>,
) -> IdentityResult<Json<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let mut user = load_self(&state, &principal).await?;

    apply_profile_update(
        &mut user,
        req.email,
        req.username,
        req.bio,
        req.first_name,
        req.last_name,
    )?;

    state.repo.update(&user).await?;

    tracing::info!(user_id = %user.user_id, "Profile updated");

    Ok(Json(UserResponse::from(&user)))
}

// ============================================================================
// Helper Functions
// ============================================================================

async fn load_self<R>(state: &UsersAppState<R>, principal: &Principal) -> IdentityResult<User>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let auth = principal
        .user()
        .ok_or(IdentityError::AuthenticationFailed)?;

    state
        .repo
        .find_by_id(&kernel::id::UserId::from_uuid(auth.user_id))
        .await?
        .ok_or(IdentityError::AuthenticationFailed)
}

fn parse_role(code: Option<&str>) -> IdentityResult<Option<Role>> {
    match code {
        None => Ok(None),
        Some(code) => Role::from_code(code)
            .map(Some)
            .ok_or_else(|| AppError::bad_request(format!("Invalid role: {code}")).into()),
    }
}

fn apply_profile_update(
    user: &mut User,
    email: Option<String>,
    username: Option<String>,
    bio: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
) -> IdentityResult<()> {
    if let Some(email) = email {
        user.set_email(Email::new(&email)?);
    }
    if let Some(username) = username {
        user.set_username(Username::new(&username)?);
    }
    user.set_profile(bio, first_name, last_name);
    Ok(())
}
