use crate::error::AppError;
use crate::AppState;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::extractor::{authenticate, CurrentUser};

/// Middleware that requires a valid bearer token for all requests.
/// Apply this to routers that are protected as a whole; the decoded user id is
/// attached to the request as [`CurrentUser`].
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match authenticate(request.headers(), &state.tokens) {
        Ok(user_id) => {
            request.extensions_mut().insert(CurrentUser(user_id));
            next.run(request).await
        }
        Err(e) => AppError::from(e).into_response(),
    }
}
