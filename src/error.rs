use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Missing required columns in {entity} CSV: {columns}")]
    MissingColumns { entity: String, columns: String },

    #[error("{entity} record has no natural key")]
    MissingNaturalKey { entity: String },

    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Error decoding CSV content: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream {service} returned {status}: {body}")]
    UpstreamStatus {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Closed taxonomy every [`Error`] falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Client-fixable request or input problems.
    Validation,
    /// The remote API or the backend failed in transport.
    Upstream,
    /// Missing or malformed credentials/configuration.
    Config,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::BadRequest(_)
            | Error::MissingColumns { .. }
            | Error::MissingNaturalKey { .. }
            | Error::Csv(_)
            | Error::Base64(_)
            | Error::Json(_)
            | Error::Validation(_) => ErrorKind::Validation,
            Error::Database(_) | Error::Http(_) | Error::UpstreamStatus { .. } => {
                ErrorKind::Upstream
            }
            Error::Config(_) => ErrorKind::Config,
            Error::Io(_) | Error::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Error::BadRequest(msg.into())
    }
}

/// Renders the `{status, message, error_id}` envelope and logs the full error
/// under the same id.
pub fn error_response(err: &Error, message: String) -> axum::response::Response {
    let error_id = Uuid::new_v4();
    let status = err.status_code();
    if status.is_server_error() {
        tracing::error!(%error_id, error = ?err, "request failed");
    } else {
        tracing::warn!(%error_id, error = %err, "request rejected");
    }

    let body = Json(json!({
        "status": "error",
        "message": message,
        "error_id": error_id,
    }));
    (status, body).into_response()
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let message = match self.kind() {
            ErrorKind::Validation => self.to_string(),
            ErrorKind::Config => "Service is not configured for this operation".to_string(),
            _ => "An unexpected error occurred".to_string(),
        };
        error_response(&self, message)
    }
}
