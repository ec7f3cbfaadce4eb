pub mod health;
pub mod sync;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::{
    dto::sync_dto::{ErrorResponse, HealthResponse, SyncPayload, SyncResponse},
    middleware::cors::cors_layer,
    AppState,
};

/// Base64 CSV uploads are carried inline in the JSON body.
const BODY_LIMIT: usize = 100 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        sync::sync_candidates,
        sync::sync_job_postings,
        sync::sync_applications,
        sync::sync_interviews,
    ),
    components(schemas(SyncPayload, SyncResponse, ErrorResponse, HealthResponse)),
    tags((name = "sync", description = "ATS import endpoints"))
)]
pub struct ApiDoc;

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"status": "error", "message": "Not found"})),
    )
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_allowed_origins);

    Router::new()
        .route("/", get(health::health))
        .route("/health", get(health::health))
        .route("/sync/candidates", post(sync::sync_candidates))
        .route("/sync/job_postings", post(sync::sync_job_postings))
        .route("/sync/jobs", post(sync::sync_job_postings))
        .route("/sync/applications", post(sync::sync_applications))
        .route("/sync/interviews", post(sync::sync_interviews))
        .route("/api-docs/openapi.json", get(openapi_json))
        .fallback(not_found)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
}
