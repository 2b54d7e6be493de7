use crate::api::RecipeListResponse;
use crate::auth::AuthUser;
use crate::domain::recipes;
use crate::error::ErrorResponse;
use crate::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use utoipa::OpenApi;

/// Returns the router for /my-recipes. Mounted behind `require_auth`.
pub fn router() -> Router<AppState> {
    Router::new().route("/my-recipes", get(list_my_recipes))
}

#[utoipa::path(
    get,
    path = "/my-recipes",
    tag = "recipes",
    responses(
        (status = 200, description = "Recipes owned by the caller", body = RecipeListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Store failure; `data` is still an empty array", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_my_recipes(AuthUser(user_id): AuthUser, State(state): State<AppState>) -> Response {
    match recipes::list_owned_recipes(state.store.as_ref(), user_id).await {
        Ok(data) => Json(RecipeListResponse {
            success: true,
            data,
        })
        .into_response(),
        Err(e) => e.into_list_response(),
    }
}

#[derive(OpenApi)]
#[openapi(paths(list_my_recipes))]
pub struct ApiDoc;
