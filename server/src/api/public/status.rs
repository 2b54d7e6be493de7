use axum::response::{Html, IntoResponse};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PingResponse {
    pub message: String,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "status",
    responses(
        (status = 200, description = "Service banner", content_type = "text/html")
    )
)]
pub async fn root() -> impl IntoResponse {
    Html("<h1>Potluck API</h1><p>See <a href=\"/swagger-ui/\">/swagger-ui</a> for the endpoints.</p>")
}

#[utoipa::path(
    get,
    path = "/ping",
    tag = "status",
    responses(
        (status = 200, description = "Liveness check", body = PingResponse)
    )
)]
pub async fn ping() -> impl IntoResponse {
    Json(PingResponse {
        message: "pong".to_string(),
    })
}
