use crate::api::RecipeListResponse;
use crate::domain::recipes;
use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListRecipesParams {
    /// Case-insensitive substring of the recipe name
    pub q: Option<String>,
}

#[utoipa::path(
    get,
    path = "/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "All recipes in creation order", body = RecipeListResponse)
    )
)]
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(params): Query<ListRecipesParams>,
) -> Result<Json<RecipeListResponse>, AppError> {
    let data = recipes::list_recipes(state.store.as_ref(), params.q.as_deref()).await?;

    Ok(Json(RecipeListResponse {
        success: true,
        data,
    }))
}
