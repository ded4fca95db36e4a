//! Bearer-token authentication middleware.
//!
//! The gate verifies the access token, loads the account, and requires it
//! to exist and be active. Every rejection uses the same generic message
//! so that callers cannot distinguish the failure cause.

use axum::{
    async_trait,
    body::Body,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::db::{Role, User, UserRepository};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Generic rejection message for all authentication failures.
const UNAUTHORIZED_MESSAGE: &str = "Not authorized to access this route";

/// Middleware that makes the application state visible to the auth
/// extractors via request extensions.
pub async fn auth_gate(state: Arc<AppState>, mut request: Request<Body>, next: Next) -> Response {
    request.extensions_mut().insert(state);
    next.run(request).await
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}

async fn resolve_user(parts: &mut Parts) -> Result<User, ApiError> {
    let token = bearer_token(parts)
        .ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED_MESSAGE))?
        .to_string();

    let state = parts
        .extensions
        .get::<Arc<AppState>>()
        .cloned()
        .ok_or_else(|| ApiError::internal("Authentication state not configured"))?;

    let claims = state
        .auth
        .tokens()
        .verify_access_token(&token)
        .map_err(|e| {
            tracing::debug!("Access token rejected: {}", e);
            ApiError::unauthorized(UNAUTHORIZED_MESSAGE)
        })?;

    let user = UserRepository::new(state.db.pool())
        .find_by_id(claims.sub)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED_MESSAGE))?;

    if !user.is_active {
        return Err(ApiError::unauthorized(UNAUTHORIZED_MESSAGE));
    }

    Ok(user)
}

/// Extractor for authenticated users.
///
/// Handlers taking this extractor require a valid bearer token resolving
/// to an existing, active account.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        resolve_user(parts).await.map(AuthUser)
    }
}

/// Optional authentication extractor.
///
/// Never rejects the request; the account is attached only when the full
/// verification chain succeeds.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<User>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuthUser(resolve_user(parts).await.ok()))
    }
}

/// Role-gate middleware, composed after authentication.
///
/// Authenticates the request, then requires the account's role to be in
/// the allowed set. The resolved account is inserted into request
/// extensions for downstream handlers.
pub async fn require_role(
    allowed: &'static [Role],
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let (mut parts, body) = request.into_parts();

    let user = resolve_user(&mut parts).await?;
    if !user.has_any_role(allowed) {
        return Err(ApiError::forbidden(
            "You do not have permission to perform this action",
        ));
    }

    let mut request = Request::from_parts(parts, body);
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
