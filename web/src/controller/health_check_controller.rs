use crate::controller::ApiResponse;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

/// GET the API router health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API router is up and responding to requests"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse::new(StatusCode::OK.into(), "healthy")),
    )
}
