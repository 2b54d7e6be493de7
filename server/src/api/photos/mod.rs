pub mod get;
pub mod get_thumbnail;

use crate::error::AppError;
use crate::AppState;
use axum::body::Body;
use axum::http::header;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for recipe images. Public, like the recipes that link to them.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/photos/{id}", get(get::get_photo))
        .route(
            "/photos/{id}/thumbnail",
            get(get_thumbnail::get_photo_thumbnail),
        )
}

#[derive(OpenApi)]
#[openapi(paths(get::get_photo, get_thumbnail::get_photo_thumbnail))]
pub struct ApiDoc;

/// Photo ids always refer to the same bytes, so responses are cached for good.
pub(crate) fn image_response(content_type: &str, data: Vec<u8>) -> Result<Response, AppError> {
    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, "public, max-age=31536000, immutable")
        .body(Body::from(data))
        .map_err(|e| AppError::Internal(format!("Failed to build image response: {}", e)))
}
