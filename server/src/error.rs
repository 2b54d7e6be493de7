use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::auth::TokenError;
use crate::store::{StoreError, UniqueField};

/// Shared error body used by all endpoints: `{success: false, message, ...context}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    /// The single input field the error is about.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Per-field flags marking which required inputs were missing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, bool>>,
    /// Present on list endpoints so clients always receive an array.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<Object>>)]
    pub data: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            field: None,
            fields: None,
            data: None,
            max_size: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{message}")]
    InvalidField {
        message: String,
        field: &'static str,
    },

    #[error("{message}")]
    MissingFields {
        message: String,
        fields: BTreeMap<String, bool>,
    },

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("File too large")]
    UploadTooLarge { max_bytes: usize },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::InvalidField { .. }
            | AppError::MissingFields { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UploadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorResponse {
        match self {
            AppError::InvalidField { message, field } => ErrorResponse {
                field: Some(field.to_string()),
                ..ErrorResponse::new(message.clone())
            },
            AppError::MissingFields { message, fields } => ErrorResponse {
                fields: Some(fields.clone()),
                ..ErrorResponse::new(message.clone())
            },
            AppError::UploadTooLarge { max_bytes } => ErrorResponse {
                max_size: Some(format_size(*max_bytes)),
                ..ErrorResponse::new(self.to_string())
            },
            // Store and service failures are logged, never echoed to clients
            AppError::Internal(_) => ErrorResponse::new("Server Error"),
            other => ErrorResponse::new(other.to_string()),
        }
    }

    /// Render this error for an endpoint whose payload must always be an array.
    pub fn into_list_response(self) -> Response {
        self.log();
        let body = ErrorResponse {
            data: Some(Vec::new()),
            ..self.body()
        };
        (self.status(), Json(body)).into_response()
    }

    fn log(&self) {
        if let AppError::Internal(detail) = self {
            tracing::error!(error = %detail, "request failed");
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        (self.status(), Json(self.body())).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(field) => AppError::InvalidField {
                message: format!("{} already in use", field),
                field: field.as_str(),
            },
            StoreError::MissingRecipe(_) => AppError::NotFound("Recipe not found".to_string()),
            StoreError::Backend(msg) => AppError::Internal(msg),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(msg) => AppError::Internal(msg),
            other => AppError::Unauthenticated(other.to_string()),
        }
    }
}

impl From<UniqueField> for AppError {
    fn from(field: UniqueField) -> Self {
        StoreError::Duplicate(field).into()
    }
}

fn format_size(bytes: usize) -> String {
    const MB: usize = 1024 * 1024;
    if bytes >= MB && bytes % MB == 0 {
        format!("{}MB", bytes / MB)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthenticated("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::Forbidden("x".into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::UploadTooLarge { max_bytes: 1 }.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            AppError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let body = AppError::Internal("connection refused".into()).body();
        assert_eq!(body.message, "Server Error");
        assert!(!body.success);
    }

    #[test]
    fn test_duplicate_names_field() {
        let err: AppError = StoreError::Duplicate(UniqueField::Email).into();
        let json = serde_json::to_value(err.body()).unwrap();
        assert_eq!(json["message"], "email already in use");
        assert_eq!(json["field"], "email");
        assert_eq!(json["success"], false);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_missing_recipe_is_not_found() {
        let err: AppError = StoreError::MissingRecipe(uuid::Uuid::new_v4()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.body().message, "Recipe not found");
    }

    #[test]
    fn test_upload_too_large_body() {
        let json = serde_json::to_value(
            AppError::UploadTooLarge {
                max_bytes: 5 * 1024 * 1024,
            }
            .body(),
        )
        .unwrap();
        assert_eq!(json["maxSize"], "5MB");
        assert_eq!(json["message"], "File too large");
    }
}
