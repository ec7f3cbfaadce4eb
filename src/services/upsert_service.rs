use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::database::store::RecordStore;
use crate::error::Result;
use crate::models::Record;
use crate::utils::time::now;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncCounts {
    pub inserted: usize,
    pub updated: usize,
}

impl SyncCounts {
    fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Inserted => self.inserted += 1,
            UpsertOutcome::Updated => self.updated += 1,
        }
    }
}

/// Insert-or-update keyed by record id. Records are written one at a time
/// with no transaction across them.
#[derive(Clone)]
pub struct UpsertEngine {
    store: Arc<dyn RecordStore>,
}

impl UpsertEngine {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn upsert(&self, mut record: Record) -> Result<UpsertOutcome> {
        let kind = record.kind();
        let exists = !record.id().is_nil() && self.store.exists(kind, record.id()).await?;

        if exists {
            record.stamp_updated(now());
            info!("Updating {} {} ({})", kind, record.id(), record.label());
            self.store.update(&record).await?;
            Ok(UpsertOutcome::Updated)
        } else {
            if record.id().is_nil() {
                record.set_id(Uuid::new_v4());
            }
            record.stamp_inserted(now());
            info!("Inserting new {} {} ({})", kind, record.id(), record.label());
            self.store.insert(&record).await?;
            Ok(UpsertOutcome::Inserted)
        }
    }

    /// Upserts every record, logging and skipping the ones that fail.
    pub async fn upsert_many(&self, records: Vec<Record>) -> SyncCounts {
        let mut counts = SyncCounts::default();
        if records.is_empty() {
            info!("No records to upsert");
            return counts;
        }

        for record in records {
            let kind = record.kind();
            let id = record.id();
            match self.upsert(record).await {
                Ok(outcome) => counts.record(outcome),
                Err(e) => error!("Error upserting {} {}: {}", kind, id, e),
            }
        }

        info!(
            "Upsert complete. Inserted: {}, Updated: {}",
            counts.inserted, counts.updated
        );
        counts
    }
}
