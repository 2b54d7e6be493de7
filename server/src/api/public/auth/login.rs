use super::AuthResponse;
use crate::api::json_body;
use crate::domain::accounts;
use crate::error::{AppError, ErrorResponse};
use crate::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body(content = LoginRequest, example = json!({"email": "ada@example.com", "password": "secret1"})),
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let req = json_body(payload)?;

    let session = accounts::login(state.store.as_ref(), &state.tokens, req.email, req.password).await?;

    Ok(Json(AuthResponse::from_session(session, "Login successful")))
}
