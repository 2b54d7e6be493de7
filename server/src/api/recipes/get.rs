use crate::api::parse_id;
use crate::domain::recipes;
use crate::error::{AppError, ErrorResponse};
use crate::models::Recipe;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub success: bool,
    pub data: Recipe,
}

#[utoipa::path(
    get,
    path = "/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe details", body = RecipeResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecipeResponse>, AppError> {
    let id: Uuid = parse_id(&id, "Recipe not found")?;
    let data = recipes::get_recipe(state.store.as_ref(), id).await?;

    Ok(Json(RecipeResponse {
        success: true,
        data,
    }))
}
