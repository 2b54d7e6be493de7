use crate::error::AppError;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use std::sync::Arc;
use uuid::Uuid;

use super::token::{TokenError, TokenService};

/// Identity attached to the request by [`super::require_auth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub Uuid);

/// Extractor that provides the authenticated user's id.
///
/// Reuses the identity attached by the `require_auth` middleware when it ran,
/// otherwise validates the Authorization header itself:
/// ```ignore
/// async fn my_handler(AuthUser(user_id): AuthUser) -> impl IntoResponse {
///     // user_id is the caller's Uuid
/// }
/// ```
pub struct AuthUser(pub Uuid);

pub enum AuthError {
    MissingHeader,
    InvalidHeader,
    InvalidFormat,
    InvalidToken,
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let message = match err {
            AuthError::MissingHeader => "Missing Authorization header",
            AuthError::InvalidHeader => "Invalid Authorization header",
            AuthError::InvalidFormat => "Invalid Authorization header format",
            AuthError::InvalidToken => "Invalid or expired token",
        };
        AppError::Unauthenticated(message.to_string())
    }
}

/// Pull the bearer token out of the headers and verify it.
pub fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> Result<Uuid, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?;

    let auth_str = auth_header.to_str().map_err(|_| AuthError::InvalidHeader)?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::InvalidFormat)?;

    tokens.verify(token).map_err(|e| {
        match e {
            TokenError::Expired => tracing::debug!("Rejected expired token"),
            other => tracing::debug!("Rejected token: {}", other),
        }
        AuthError::InvalidToken
    })
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<TokenService>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(CurrentUser(id)) = parts.extensions.get::<CurrentUser>() {
            return Ok(AuthUser(*id));
        }

        let tokens = Arc::<TokenService>::from_ref(state);
        let user_id = authenticate(&parts.headers, &tokens)?;
        parts.extensions.insert(CurrentUser(user_id));
        Ok(AuthUser(user_id))
    }
}
