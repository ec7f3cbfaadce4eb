use std::io::Write;
use std::path::Path;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tempfile::NamedTempFile;

use crate::{
    dto::sync_dto::{ErrorResponse, SyncPayload, SyncResponse, SyncSource},
    error::{error_response, ErrorKind, Result},
    middleware::auth::BearerToken,
    models::{
        application::Application, candidate::Candidate, interview::Interview,
        job_posting::JobPosting,
    },
    services::transform::SyncEntity,
    AppState,
};

/// Writes decoded CSV bytes to a scratch file that is removed when dropped.
fn write_scratch_file(dir: &Path, bytes: &[u8]) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("ats-sync-")
        .suffix(".csv")
        .tempfile_in(dir)?;
    file.write_all(bytes)?;
    file.flush()?;
    Ok(file)
}

async fn sync_entity<T: SyncEntity>(
    state: &AppState,
    credential: Option<&str>,
    body: &[u8],
) -> Result<SyncResponse> {
    let payload = SyncPayload::from_body(body)?;
    let ctx = payload.context()?;

    if let Some(content) = payload.csv_content() {
        let compact: String = content.split_whitespace().collect();
        let bytes = STANDARD.decode(compact)?;
        let scratch = write_scratch_file(&state.config.scratch_dir, &bytes)?;
        let counts = state
            .importer
            .import_from_csv::<T>(scratch.path(), &ctx)
            .await?;
        return Ok(SyncResponse::success(SyncSource::Csv, counts));
    }

    let counts = state
        .importer
        .import_from_remote::<T>(&ctx, credential, payload.test_mode)
        .await?;
    Ok(SyncResponse::success(SyncSource::MergeApi, counts))
}

async fn run_sync<T: SyncEntity>(state: AppState, bearer: BearerToken, body: Bytes) -> Response {
    match sync_entity::<T>(&state, bearer.as_deref(), &body).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            let message = match e.kind() {
                ErrorKind::Validation => e.to_string(),
                _ => format!("An error occurred while syncing {}: {}", T::KIND, e),
            };
            error_response(&e, message)
        }
    }
}

#[utoipa::path(
    post,
    path = "/sync/candidates",
    request_body = SyncPayload,
    responses(
        (status = 200, description = "Candidates imported", body = SyncResponse),
        (status = 400, description = "Invalid request or CSV", body = ErrorResponse),
        (status = 500, description = "Import failed", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn sync_candidates(
    State(state): State<AppState>,
    bearer: BearerToken,
    body: Bytes,
) -> Response {
    run_sync::<Candidate>(state, bearer, body).await
}

#[utoipa::path(
    post,
    path = "/sync/job_postings",
    request_body = SyncPayload,
    responses(
        (status = 200, description = "Job postings imported", body = SyncResponse),
        (status = 400, description = "Invalid request or CSV", body = ErrorResponse),
        (status = 500, description = "Import failed", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn sync_job_postings(
    State(state): State<AppState>,
    bearer: BearerToken,
    body: Bytes,
) -> Response {
    run_sync::<JobPosting>(state, bearer, body).await
}

#[utoipa::path(
    post,
    path = "/sync/applications",
    request_body = SyncPayload,
    responses(
        (status = 200, description = "Applications imported", body = SyncResponse),
        (status = 400, description = "Invalid request or CSV", body = ErrorResponse),
        (status = 500, description = "Import failed", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn sync_applications(
    State(state): State<AppState>,
    bearer: BearerToken,
    body: Bytes,
) -> Response {
    run_sync::<Application>(state, bearer, body).await
}

#[utoipa::path(
    post,
    path = "/sync/interviews",
    request_body = SyncPayload,
    responses(
        (status = 200, description = "Interviews imported", body = SyncResponse),
        (status = 400, description = "Invalid request or CSV", body = ErrorResponse),
        (status = 500, description = "Import failed", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn sync_interviews(
    State(state): State<AppState>,
    bearer: BearerToken,
    body: Bytes,
) -> Response {
    run_sync::<Interview>(state, bearer, body).await
}
