use std::sync::Arc;

use tracing::{error, warn};
use uuid::Uuid;

use crate::database::store::RecordStore;
use crate::models::application::ApplicationRefs;
use crate::models::EntityKind;

pub const MERGE_CANDIDATE_TAG: &str = "merge-";
pub const MERGE_JOB_TAG: &str = "merge-job-";
pub const MERGE_APPLICATION_TAG: &str = "merge-app-";
pub const MERGE_INTERVIEW_TAG: &str = "merge-interview-";

pub const CSV_CANDIDATE_TAG: &str = "csv-";
pub const CSV_JOB_TAG: &str = "csv-job-";
pub const CSV_APPLICATION_TAG: &str = "csv-app-";
pub const CSV_INTERVIEW_TAG: &str = "csv-interview-";

/// UUIDv5 over the DNS namespace of `tag + natural_key`.
pub fn derive_id(tag: &str, natural_key: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_DNS, format!("{}{}", tag, natural_key).as_bytes())
}

pub fn remote_tag(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Candidate => MERGE_CANDIDATE_TAG,
        EntityKind::JobPosting => MERGE_JOB_TAG,
        EntityKind::Application => MERGE_APPLICATION_TAG,
        EntityKind::Interview => MERGE_INTERVIEW_TAG,
    }
}

/// Turns external references into backend ids, but only for rows that are
/// already present.
#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn RecordStore>,
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn resolve_reference(&self, kind: EntityKind, external_id: &str) -> Option<Uuid> {
        let external_id = external_id.trim();
        if external_id.is_empty() {
            return None;
        }
        let id = derive_id(remote_tag(kind), external_id);
        let found = self.probe(kind, id).await;
        if found.is_none() {
            warn!(
                "{} with ID {} (from Merge ID {}) not found in database",
                kind, id, external_id
            );
        }
        found
    }

    /// Same probe for an id that is already internal.
    pub async fn verify_reference(&self, kind: EntityKind, internal_id: Uuid) -> Option<Uuid> {
        let found = self.probe(kind, internal_id).await;
        if found.is_none() {
            warn!("{} with ID {} not found in database", kind, internal_id);
        }
        found
    }

    /// Reads the candidate and job posting an application points at, given
    /// the application's Merge id.
    pub async fn resolve_application(&self, external_application_id: &str) -> Option<ApplicationRefs> {
        let external_application_id = external_application_id.trim();
        if external_application_id.is_empty() {
            return None;
        }
        let id = derive_id(MERGE_APPLICATION_TAG, external_application_id);
        let refs = self.application_refs(id).await;
        if refs.is_none() {
            warn!(
                "Application with ID {} (from Merge ID {}) not found in database",
                id, external_application_id
            );
        }
        refs
    }

    /// Stored references of an application by internal id.
    pub async fn application_refs(&self, id: Uuid) -> Option<ApplicationRefs> {
        match self.store.application_refs(id).await {
            Ok(refs) => refs,
            Err(e) => {
                error!("Error resolving application {}: {}", id, e);
                None
            }
        }
    }

    async fn probe(&self, kind: EntityKind, id: Uuid) -> Option<Uuid> {
        match self.store.exists(kind, id).await {
            Ok(true) => Some(id),
            Ok(false) => None,
            Err(e) => {
                error!("Error resolving {} ID {}: {}", kind, id, e);
                None
            }
        }
    }
}
