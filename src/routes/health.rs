use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::dto::sync_dto::HealthResponse;

pub const ENDPOINTS: [&str; 5] = [
    "/sync/candidates",
    "/sync/job_postings",
    "/sync/jobs",
    "/sync/applications",
    "/sync/interviews",
];

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
#[axum::debug_handler]
pub async fn health() -> impl IntoResponse {
    let body = HealthResponse {
        status: "success".to_string(),
        message: "API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
    };
    (StatusCode::OK, Json(body))
}
