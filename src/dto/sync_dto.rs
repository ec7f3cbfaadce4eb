use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::{Error, Result};
use crate::services::transform::SyncContext;
use crate::services::upsert_service::SyncCounts;

pub const REQUIRED_FIELDS: [&str; 2] = ["user_id", "organization_id"];

/// Body of every `POST /sync/*` call.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SyncPayload {
    pub user_id: String,
    pub organization_id: String,
    /// Base64-encoded CSV file. When present and non-empty it replaces the
    /// remote fetch.
    #[validate(length(max = 70000000))]
    #[serde(default)]
    pub csv_file: Option<String>,
    #[serde(default)]
    pub test_mode: bool,
}

impl SyncPayload {
    /// Parses a raw request body, reporting missing identifiers by name
    /// before any type checks.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        let value: JsonValue = serde_json::from_slice(body)
            .map_err(|_| Error::bad_request("Request must be JSON"))?;
        let JsonValue::Object(object) = value else {
            return Err(Error::bad_request("Request must be JSON"));
        };

        let missing = missing_fields(&object);
        if !missing.is_empty() {
            return Err(Error::bad_request(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let payload: SyncPayload = serde_json::from_value(JsonValue::Object(object))?;
        payload.validate()?;
        Ok(payload)
    }

    pub fn context(&self) -> Result<SyncContext> {
        Ok(SyncContext {
            user_id: parse_uuid("user_id", &self.user_id)?,
            organization_id: parse_uuid("organization_id", &self.organization_id)?,
        })
    }

    /// The CSV payload, if one was sent.
    pub fn csv_content(&self) -> Option<&str> {
        self.csv_file
            .as_deref()
            .map(str::trim)
            .filter(|content| !content.is_empty())
    }
}

fn missing_fields(object: &Map<String, JsonValue>) -> Vec<&'static str> {
    REQUIRED_FIELDS
        .into_iter()
        .filter(|field| match object.get(*field) {
            None | Some(JsonValue::Null) => true,
            Some(JsonValue::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        })
        .collect()
}

fn parse_uuid(field: &str, raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| Error::bad_request(format!("Invalid UUID for {}: {}", field, raw)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SyncSource {
    Csv,
    MergeApi,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SyncResponse {
    pub status: String,
    pub source: String,
    pub inserted: usize,
    pub updated: usize,
}

impl SyncResponse {
    pub fn success(source: SyncSource, counts: SyncCounts) -> Self {
        let source = match source {
            SyncSource::Csv => "csv",
            SyncSource::MergeApi => "merge_api",
        };
        Self {
            status: "success".to_string(),
            source: source.to_string(),
            inserted: counts.inserted,
            updated: counts.updated,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub error_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
    pub endpoints: Vec<String>,
}
