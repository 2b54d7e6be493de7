use crate::api::{json_body, parse_id};
use crate::auth::AuthUser;
use crate::domain::favorites::{self, ToggleOutcome};
use crate::error::{AppError, ErrorResponse};
use crate::models::Favorite;
use crate::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ToggleFavoriteRequest {
    pub recipe_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ToggleFavoriteResponse {
    pub success: bool,
    pub message: String,
    /// The new favorite; absent when the favorite was removed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Favorite>,
}

#[utoipa::path(
    post,
    path = "/favorites/toggle",
    tag = "favorites",
    request_body(content = ToggleFavoriteRequest, example = json!({"recipeId": "5b0c6f1e-3b7a-4d43-9d1e-0c2f4b8a9e11"})),
    responses(
        (status = 200, description = "Favorite added or removed", body = ToggleFavoriteResponse),
        (status = 400, description = "Missing recipe id", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn toggle_favorite(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<ToggleFavoriteRequest>, JsonRejection>,
) -> Result<Json<ToggleFavoriteResponse>, AppError> {
    let req = json_body(payload)?;

    let raw = req
        .recipe_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Recipe ID is required".to_string()))?;
    let recipe_id = parse_id(&raw, "Recipe not found")?;

    let response = match favorites::toggle_favorite(state.store.as_ref(), user_id, recipe_id).await? {
        ToggleOutcome::Added(favorite) => ToggleFavoriteResponse {
            success: true,
            message: "Added to favorites".to_string(),
            data: Some(favorite),
        },
        ToggleOutcome::Removed => ToggleFavoriteResponse {
            success: true,
            message: "Removed from favorites".to_string(),
            data: None,
        },
    };

    Ok(Json(response))
}
