use crate::auth::AuthUser;
use crate::domain::favorites::{self, FavoriteEntry};
use crate::error::ErrorResponse;
use crate::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FavoriteListResponse {
    pub success: bool,
    pub data: Vec<FavoriteEntry>,
}

#[utoipa::path(
    get,
    path = "/favorites",
    tag = "favorites",
    responses(
        (status = 200, description = "The caller's favorites with recipes resolved", body = FavoriteListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Store failure; `data` is still an empty array", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_favorites(AuthUser(user_id): AuthUser, State(state): State<AppState>) -> Response {
    match favorites::list_favorites(state.store.as_ref(), user_id).await {
        Ok(data) => Json(FavoriteListResponse {
            success: true,
            data,
        })
        .into_response(),
        Err(e) => e.into_list_response(),
    }
}
