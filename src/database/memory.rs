use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::store::RecordStore;
use crate::error::{Error, Result};
use crate::models::application::ApplicationRefs;
use crate::models::{EntityKind, Record};

/// In-process store with the same overwrite semantics as [`PgStore`].
///
/// Used by the test suites and for dry runs without a database.
///
/// [`PgStore`]: crate::database::postgres::PgStore
#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<HashMap<(EntityKind, Uuid), Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, kind: EntityKind, id: Uuid) -> Option<Record> {
        self.rows.read().await.get(&(kind, id)).cloned()
    }

    pub async fn count(&self, kind: EntityKind) -> usize {
        self.rows
            .read()
            .await
            .keys()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    /// Seeds a row directly, bypassing the upsert engine.
    pub async fn put(&self, record: Record) {
        self.rows
            .write()
            .await
            .insert((record.kind(), record.id()), record);
    }
}

/// Keeps stored values the incoming record leaves empty, matching the
/// `COALESCE` columns of the Postgres update statements.
fn merge_update(existing: &Record, incoming: &Record) -> Record {
    let mut merged = incoming.clone();
    match (existing, &mut merged) {
        (Record::Candidate(old), Record::Candidate(new)) => {
            new.created_at = new.created_at.or(old.created_at);
        }
        (Record::JobPosting(old), Record::JobPosting(new)) => {
            new.created_at = new.created_at.or(old.created_at);
        }
        (Record::Application(old), Record::Application(new)) => {
            new.candidate_id = new.candidate_id.or(old.candidate_id);
            new.job_posting_id = new.job_posting_id.or(old.job_posting_id);
            new.applied_at = new.applied_at.or(old.applied_at);
        }
        (Record::Interview(old), Record::Interview(new)) => {
            new.candidate_id = new.candidate_id.or(old.candidate_id);
            new.job_id = new.job_id.or(old.job_id);
            new.date = new.date.or(old.date);
            new.created_at = new.created_at.or(old.created_at);
            if new.calendar_event_id.is_none() {
                new.calendar_event_id = old.calendar_event_id.clone();
            }
        }
        _ => {}
    }
    merged
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn exists(&self, kind: EntityKind, id: Uuid) -> Result<bool> {
        Ok(self.rows.read().await.contains_key(&(kind, id)))
    }

    async fn insert(&self, record: &Record) -> Result<()> {
        let mut rows = self.rows.write().await;
        let key = (record.kind(), record.id());
        if rows.contains_key(&key) {
            return Err(Error::Internal(format!(
                "duplicate key {} in {}",
                record.id(),
                record.kind().table()
            )));
        }
        rows.insert(key, record.clone());
        Ok(())
    }

    async fn update(&self, record: &Record) -> Result<()> {
        let mut rows = self.rows.write().await;
        let key = (record.kind(), record.id());
        if let Some(existing) = rows.get(&key) {
            let merged = merge_update(existing, record);
            rows.insert(key, merged);
        }
        Ok(())
    }

    async fn application_refs(&self, id: Uuid) -> Result<Option<ApplicationRefs>> {
        let rows = self.rows.read().await;
        Ok(match rows.get(&(EntityKind::Application, id)) {
            Some(Record::Application(app)) => Some(ApplicationRefs {
                candidate_id: app.candidate_id,
                job_posting_id: app.job_posting_id,
            }),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::application::{Application, ApplicationStatus};
    use chrono::Utc;

    fn application(candidate_id: Option<Uuid>) -> Application {
        Application {
            id: Uuid::from_u128(7),
            organization_id: Uuid::from_u128(1),
            user_id: Uuid::from_u128(2),
            created_by: Uuid::from_u128(2),
            candidate_id,
            job_posting_id: None,
            status: ApplicationStatus::Applied,
            applied_at: Some(Utc::now()),
            last_updated: None,
        }
    }

    #[tokio::test]
    async fn update_keeps_previously_resolved_references() {
        let store = MemoryStore::new();
        let candidate = Uuid::from_u128(99);
        store
            .insert(&Record::Application(application(Some(candidate))))
            .await
            .unwrap();

        let mut later = application(None);
        later.status = ApplicationStatus::Hired;
        store.update(&Record::Application(later)).await.unwrap();

        let refs = store
            .application_refs(Uuid::from_u128(7))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(refs.candidate_id, Some(candidate));
        match store
            .get(EntityKind::Application, Uuid::from_u128(7))
            .await
        {
            Some(Record::Application(app)) => assert_eq!(app.status, ApplicationStatus::Hired),
            other => panic!("unexpected row: {:?}", other),
        }
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let store = MemoryStore::new();
        let record = Record::Application(application(None));
        store.insert(&record).await.unwrap();
        assert!(store.insert(&record).await.is_err());
        assert_eq!(store.count(EntityKind::Application).await, 1);
    }
}
