use crate::domain::recipes::RecipeForm;
use crate::error::AppError;
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::http::StatusCode;
use serde::Deserialize;
use utoipa::ToSchema;

/// Multipart body accepted by create and update.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct RecipeFormRequest {
    pub name: String,
    /// Comma separated, e.g. `eggs, milk, flour`
    pub ingredients: String,
    pub time_to_cook: String,
    /// Sentences separated by `.`
    pub steps: String,
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

fn read_error(e: MultipartError, max_upload_bytes: usize) -> AppError {
    tracing::warn!("Multipart read error: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::UploadTooLarge {
            max_bytes: max_upload_bytes,
        }
    } else {
        AppError::Validation(format!("Failed to read multipart data: {}", e.body_text()))
    }
}

/// Collect the recipe fields from a multipart body. Unknown fields are skipped.
pub async fn read_recipe_form(
    multipart: Result<Multipart, MultipartRejection>,
    max_upload_bytes: usize,
) -> Result<RecipeForm, AppError> {
    let mut multipart = multipart.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let mut form = RecipeForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| read_error(e, max_upload_bytes))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == "image" {
            let data = field
                .bytes()
                .await
                .map_err(|e| read_error(e, max_upload_bytes))?;
            if data.len() > max_upload_bytes {
                return Err(AppError::UploadTooLarge {
                    max_bytes: max_upload_bytes,
                });
            }
            form.image = Some(data.to_vec());
            continue;
        }

        let slot = match name.as_str() {
            "name" => &mut form.name,
            "ingredients" => &mut form.ingredients,
            "timeToCook" => &mut form.time_to_cook,
            "steps" => &mut form.steps,
            other => {
                tracing::debug!(field = other, "Ignoring unknown form field");
                continue;
            }
        };
        *slot = Some(
            field
                .text()
                .await
                .map_err(|e| read_error(e, max_upload_bytes))?,
        );
    }

    Ok(form)
}
