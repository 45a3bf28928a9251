//! Identity Routers

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use platform::mailer::{LogMailer, Mailer};

use crate::application::config::IdentityConfig;
use crate::domain::repository::UserRepository;
use crate::infra::postgres::PgUserRepository;
use crate::presentation::handlers::{self, AuthAppState, UsersAppState};

/// Create the auth router with the PostgreSQL repository and log mailer
pub fn auth_router(repo: PgUserRepository, config: Arc<IdentityConfig>) -> Router {
    auth_router_generic(repo, LogMailer::default(), config)
}

/// Create a generic auth router for any repository/mailer implementation
pub fn auth_router_generic<R, M>(repo: R, mailer: M, config: Arc<IdentityConfig>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        mailer: Arc::new(mailer),
        config,
    };

    Router::new()
        .route("/email", post(handlers::send_code::<R, M>))
        .route("/token", post(handlers::obtain_token::<R, M>))
        .route("/token/refresh", post(handlers::refresh_token::<R, M>))
        .with_state(state)
}

/// Create the users router with the PostgreSQL repository
pub fn users_router(repo: PgUserRepository, config: Arc<IdentityConfig>) -> Router {
    users_router_generic(repo, config)
}

/// Create a generic users router for any repository implementation
pub fn users_router_generic<R>(repo: R, config: Arc<IdentityConfig>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let state = UsersAppState {
        repo: Arc::new(repo),
        config,
    };

    Router::new()
        .route(
            "/",
            get(handlers::list_users::<R>).post(handlers::create_user::<R>),
        )
        .route(
            "/me",
            get(handlers::get_me::<R>).patch(handlers::update_me::<R>),
        )
        .route(
            "/{username}",
            get(handlers::get_user::<R>)
                .patch(handlers::update_user::<R>)
                .delete(handlers::delete_user::<R>),
        )
        .with_state(state)
}
