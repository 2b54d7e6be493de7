pub mod list;
pub mod remove;
pub mod toggle;

use crate::AppState;
use axum::routing::{delete, get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /favorites. Mounted behind `require_auth`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/favorites", get(list::list_favorites))
        .route("/favorites/toggle", post(toggle::toggle_favorite))
        .route("/favorites/{recipe_id}", delete(remove::remove_favorite))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        toggle::toggle_favorite,
        list::list_favorites,
        remove::remove_favorite,
    ),
    components(schemas(
        crate::models::Favorite,
        crate::domain::favorites::FavoriteEntry,
        crate::domain::favorites::RecipeRef,
        toggle::ToggleFavoriteRequest,
        toggle::ToggleFavoriteResponse,
        list::FavoriteListResponse,
    ))
)]
pub struct ApiDoc;
