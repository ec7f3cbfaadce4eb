//! Per-entity mapping from external payloads to backend records.

pub mod applications;
pub mod candidates;
pub mod interviews;
pub mod job_postings;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{EntityKind, Record};
use crate::services::identity_service::IdentityResolver;

/// Who an import runs on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncContext {
    pub user_id: Uuid,
    pub organization_id: Uuid,
}

/// An entity type the pipeline can import from Merge or from CSV.
#[async_trait]
pub trait SyncEntity: Into<Record> + Send + Sized + 'static {
    type Remote: DeserializeOwned + Send + 'static;
    type CsvRow: DeserializeOwned + Send + 'static;

    const KIND: EntityKind;
    /// Merge list resource, appended to the base URL.
    const REMOTE_PATH: &'static str;
    const REQUIRED_COLUMNS: &'static [&'static str];

    /// Fixed records served instead of the remote fetch in test mode.
    fn sample_payload() -> Vec<Self::Remote>;

    async fn from_remote(
        remote: Self::Remote,
        ctx: &SyncContext,
        resolver: &IdentityResolver,
    ) -> Result<Self>;

    async fn from_csv(
        row: Self::CsvRow,
        ctx: &SyncContext,
        resolver: &IdentityResolver,
    ) -> Result<Self>;
}

/// Trimmed value, or `None` when blank.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub(crate) fn text(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

pub(crate) fn split_list(value: Option<&str>) -> Vec<String> {
    non_empty(value)
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn parse_flag(value: Option<&str>) -> bool {
    non_empty(value).is_some_and(|v| {
        ["true", "yes", "1", "y"]
            .iter()
            .any(|accepted| v.eq_ignore_ascii_case(accepted))
    })
}

pub(crate) fn full_name(first: Option<&str>, last: Option<&str>) -> String {
    format!("{} {}", first.unwrap_or("").trim(), last.unwrap_or("").trim())
        .trim()
        .to_string()
}

/// An explicit `id` column wins over the derived id when it holds a UUID.
pub(crate) fn explicit_id(raw: Option<&str>) -> Option<Uuid> {
    let raw = non_empty(raw)?;
    match Uuid::parse_str(raw) {
        Ok(id) => Some(id),
        Err(_) => {
            tracing::warn!("Ignoring non-UUID id column value {}", raw);
            None
        }
    }
}

/// Parses an internal id carried by a CSV row; non-UUIDs are dropped.
pub(crate) fn internal_id(field: &str, raw: Option<&str>) -> Option<Uuid> {
    let raw = non_empty(raw)?;
    match Uuid::parse_str(raw) {
        Ok(id) => Some(id),
        Err(_) => {
            tracing::warn!("Column {} holds a non-UUID value {}", field, raw);
            None
        }
    }
}
