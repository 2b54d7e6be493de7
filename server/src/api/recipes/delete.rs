use crate::api::{parse_id, MessageResponse};
use crate::auth::AuthUser;
use crate::domain::recipes;
use crate::error::{AppError, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

#[utoipa::path(
    delete,
    path = "/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe and its favorites deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the recipe's owner", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_recipe(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id: Uuid = parse_id(&id, "Recipe not found")?;
    recipes::delete_recipe(state.store.as_ref(), user_id, id).await?;

    Ok(Json(MessageResponse::new(
        "Recipe deleted successfully and removed from favorites",
    )))
}
