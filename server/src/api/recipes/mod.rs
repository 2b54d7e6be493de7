pub mod create;
pub mod delete;
pub mod form;
pub mod get;
pub mod list;
pub mod update;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /recipes. Reads are public; writes authenticate
/// per handler through `AuthUser`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list::list_recipes).post(create::create_recipe))
        .route(
            "/recipes/{id}",
            get(get::get_recipe)
                .put(update::update_recipe)
                .delete(delete::delete_recipe),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_recipe,
        list::list_recipes,
        get::get_recipe,
        update::update_recipe,
        delete::delete_recipe,
    ),
    components(schemas(
        form::RecipeFormRequest,
        create::CreateRecipeResponse,
        get::RecipeResponse,
        update::UpdateRecipeResponse,
    ))
)]
pub struct ApiDoc;
