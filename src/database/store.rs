use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::application::ApplicationRefs;
use crate::models::{EntityKind, Record};

/// The backend seam the sync pipeline writes through.
///
/// Every call is a single round trip; nothing here spans records, so a failed
/// write leaves earlier writes in place.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Existence probe by primary id.
    async fn exists(&self, kind: EntityKind, id: Uuid) -> Result<bool>;

    async fn insert(&self, record: &Record) -> Result<()>;

    /// Overwrites the stored row with `record`, keyed by its id.
    async fn update(&self, record: &Record) -> Result<()>;

    /// Reads the foreign keys stored on an application row.
    async fn application_refs(&self, id: Uuid) -> Result<Option<ApplicationRefs>>;
}
