use super::image_response;
use crate::api::parse_id;
use crate::error::{AppError, ErrorResponse};
use crate::photos::processing::{generate_thumbnail, MAX_THUMBNAIL_SIZE, THUMBNAIL_SIZE};
use crate::store::MediaStore;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ThumbnailParams {
    /// Desired thumbnail size in pixels (longest edge). Clamped to 1..=800. Default: 200.
    pub size: Option<u32>,
}

#[utoipa::path(
    get,
    path = "/photos/{id}/thumbnail",
    tag = "photos",
    params(
        ("id" = Uuid, Path, description = "Photo ID"),
        ThumbnailParams,
    ),
    responses(
        (status = 200, description = "Photo thumbnail data", content_type = "image/jpeg"),
        (status = 404, description = "Photo not found", body = ErrorResponse)
    )
)]
pub async fn get_photo_thumbnail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ThumbnailParams>,
) -> Result<Response, AppError> {
    let id: Uuid = parse_id(&id, "Photo not found")?;

    let size = params
        .size
        .unwrap_or(THUMBNAIL_SIZE)
        .clamp(1, MAX_THUMBNAIL_SIZE);

    let photo = state
        .store
        .get_photo(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Photo not found".to_string()))?;

    // Fast path: the default size was generated at upload time
    if size == THUMBNAIL_SIZE {
        return image_response("image/jpeg", photo.thumbnail);
    }

    let thumbnail = tokio::task::spawn_blocking(move || generate_thumbnail(&photo.data, size))
        .await
        .map_err(|e| AppError::Internal(format!("thumbnail task failed: {}", e)))?
        .map_err(|e| {
            tracing::error!(photo_id = %id, "Failed to generate thumbnail: {}", e);
            AppError::Internal(e)
        })?;

    image_response("image/jpeg", thumbnail)
}
