use super::AuthResponse;
use crate::api::json_body;
use crate::domain::accounts::{self, Registration};
use crate::error::{AppError, ErrorResponse};
use crate::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[utoipa::path(
    post,
    path = "/register",
    tag = "auth",
    request_body(content = RegisterRequest, example = json!({"username": "ada", "email": "ada@example.com", "password": "secret1"})),
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Missing field, short password or duplicate account", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let req = json_body(payload)?;

    let session = accounts::register(
        state.store.as_ref(),
        &state.tokens,
        Registration {
            username: req.username,
            email: req.email,
            password: req.password,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::from_session(session, "User registered successfully")),
    ))
}
