use super::form::{read_recipe_form, RecipeFormRequest};
use crate::api::parse_id;
use crate::auth::AuthUser;
use crate::domain::recipes;
use crate::error::{AppError, ErrorResponse};
use crate::models::Recipe;
use crate::AppState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UpdateRecipeResponse {
    pub success: bool,
    pub message: String,
    pub data: Recipe,
}

#[utoipa::path(
    put,
    path = "/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body(content_type = "multipart/form-data", content = RecipeFormRequest),
    responses(
        (status = 200, description = "Recipe updated", body = UpdateRecipeResponse),
        (status = 400, description = "Unsupported image", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the recipe's owner", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 413, description = "Image too large", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_recipe(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UpdateRecipeResponse>, AppError> {
    let id: Uuid = parse_id(&id, "Recipe not found")?;
    let form = read_recipe_form(multipart, state.max_upload_bytes).await?;
    let data = recipes::update_recipe(state.store.as_ref(), user_id, id, form).await?;

    Ok(Json(UpdateRecipeResponse {
        success: true,
        message: "Recipe updated successfully".to_string(),
        data,
    }))
}
