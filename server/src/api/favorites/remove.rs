use crate::api::{parse_id, MessageResponse};
use crate::auth::AuthUser;
use crate::domain::favorites;
use crate::error::{AppError, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

#[utoipa::path(
    delete,
    path = "/favorites/{recipe_id}",
    tag = "favorites",
    params(
        ("recipe_id" = Uuid, Path, description = "ID of the favorited recipe")
    ),
    responses(
        (status = 200, description = "Favorite removed", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Favorite not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn remove_favorite(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let recipe_id: Uuid = parse_id(&recipe_id, "Favorite not found")?;
    favorites::remove_favorite(state.store.as_ref(), user_id, recipe_id).await?;

    Ok(Json(MessageResponse::new("Removed from favorites")))
}
