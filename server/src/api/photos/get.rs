use super::image_response;
use crate::api::parse_id;
use crate::error::{AppError, ErrorResponse};
use crate::store::MediaStore;
use crate::AppState;
use axum::{
    extract::{Path, State},
    response::Response,
};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/photos/{id}",
    tag = "photos",
    params(
        ("id" = Uuid, Path, description = "Photo ID")
    ),
    responses(
        (status = 200, description = "Original image bytes", content_type = "application/octet-stream"),
        (status = 404, description = "Photo not found", body = ErrorResponse)
    )
)]
pub async fn get_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id: Uuid = parse_id(&id, "Photo not found")?;

    let photo = state
        .store
        .get_photo(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Photo not found".to_string()))?;

    image_response(&photo.content_type, photo.data)
}
