pub mod favorites;
pub mod my_recipes;
pub mod photos;
pub mod public;
pub mod recipes;

#[cfg(test)]
mod tests;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::Serialize;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::error::{AppError, ErrorResponse};
use crate::models::Recipe;

/// Plain acknowledgement body: `{success: true, message}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// A list of recipes: `{success: true, data: [...]}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeListResponse {
    pub success: bool,
    pub data: Vec<Recipe>,
}

/// Ids arrive as raw path segments; anything that is not a UUID cannot name a
/// record, so it is reported the same way as a missing one.
pub(crate) fn parse_id(raw: &str, not_found: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::NotFound(not_found.to_string()))
}

/// Unwrap a JSON body, turning axum's rejection into the shared error shape.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            tracing::debug!("Rejected JSON body: {}", rejection.body_text());
            Err(AppError::Validation(rejection.body_text()))
        }
    }
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Potluck API", description = "Share recipes and keep a list of favorites"),
        components(schemas(ErrorResponse, MessageResponse, RecipeListResponse, Recipe))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    if let Some(components) = spec.components.as_mut() {
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }

    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        public::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
        my_recipes::ApiDoc::openapi(),
        favorites::ApiDoc::openapi(),
        photos::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);

        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}
