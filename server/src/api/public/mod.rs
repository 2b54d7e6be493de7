pub mod auth;
pub mod status;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for public endpoints (no auth required)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(status::root))
        .route("/ping", get(status::ping))
        .route("/register", post(auth::register::register))
        .route("/login", post(auth::login::login))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register::register,
        auth::login::login,
        status::root,
        status::ping,
    ),
    components(schemas(
        auth::AuthResponse,
        auth::UserSummary,
        auth::register::RegisterRequest,
        auth::login::LoginRequest,
        status::PingResponse,
    ))
)]
pub struct ApiDoc;
