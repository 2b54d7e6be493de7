use super::form::{read_recipe_form, RecipeFormRequest};
use crate::auth::AuthUser;
use crate::domain::recipes;
use crate::error::{AppError, ErrorResponse};
use crate::models::Recipe;
use crate::AppState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateRecipeResponse {
    pub success: bool,
    pub message: String,
    pub recipe: Recipe,
}

#[utoipa::path(
    post,
    path = "/recipes",
    tag = "recipes",
    request_body(content_type = "multipart/form-data", content = RecipeFormRequest),
    responses(
        (status = 200, description = "Recipe created", body = CreateRecipeResponse),
        (status = 400, description = "Missing field or unsupported image", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 413, description = "Image too large", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CreateRecipeResponse>, AppError> {
    let form = read_recipe_form(multipart, state.max_upload_bytes).await?;
    let recipe = recipes::create_recipe(state.store.as_ref(), user_id, form).await?;

    Ok(Json(CreateRecipeResponse {
        success: true,
        message: "Recipe created successfully".to_string(),
        recipe,
    }))
}
