//! Bearer-Token Middleware
//!
//! Resolves the `Authorization: Bearer` header into a [`Principal`] and
//! stores it in the request extensions. Requests without the header pass
//! through as anonymous; requests with an invalid or expired token are
//! rejected outright.

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use kernel::id::UserId;
use kernel::principal::Principal;
use platform::token::TokenKind;

use crate::application::config::IdentityConfig;
use crate::domain::repository::UserRepository;
use crate::error::IdentityError;

/// Middleware state
#[derive(Clone)]
pub struct AuthLayerState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<IdentityConfig>,
}

/// Middleware that resolves the bearer token (if any) into a principal
pub async fn authenticate<R>(
    State(state): State<AuthLayerState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let principal = match header {
        None => Principal::Anonymous,
        Some(value) => {
            let token = value
                .strip_prefix("Bearer ")
                .ok_or_else(|| IdentityError::AuthenticationFailed.into_response())?;

            let user_id = state
                .config
                .signer()
                .verify(token, TokenKind::Access)
                .map_err(|e| IdentityError::from(e).into_response())?;

            let user = state
                .repo
                .find_by_id(&UserId::from_uuid(user_id))
                .await
                .map_err(|e| e.into_response())?
                .ok_or_else(|| IdentityError::AuthenticationFailed.into_response())?;

            Principal::User(user.as_auth_user())
        }
    };

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
