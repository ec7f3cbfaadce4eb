use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::database::store::RecordStore;
use crate::error::{Error, Result};
use crate::models::Record;
use crate::services::identity_service::IdentityResolver;
use crate::services::merge_service::MergeClient;
use crate::services::token_service::TokenService;
use crate::services::transform::{SyncContext, SyncEntity};
use crate::services::upsert_service::{SyncCounts, UpsertEngine};

/// Runs one import: fetch or parse, transform, then upsert the whole batch.
#[derive(Clone)]
pub struct Importer {
    resolver: IdentityResolver,
    engine: UpsertEngine,
    merge: MergeClient,
    tokens: TokenService,
}

impl Importer {
    pub fn new(store: Arc<dyn RecordStore>, merge: MergeClient, tokens: TokenService) -> Self {
        Self {
            resolver: IdentityResolver::new(store.clone()),
            engine: UpsertEngine::new(store),
            merge,
            tokens,
        }
    }

    pub async fn import_from_remote<T: SyncEntity>(
        &self,
        ctx: &SyncContext,
        credential: Option<&str>,
        test_mode: bool,
    ) -> Result<SyncCounts> {
        let payload = if test_mode {
            info!("TEST MODE: Using sample {} data", T::KIND);
            T::sample_payload()
        } else {
            let account_token = self.tokens.account_token(credential).await?;
            self.merge
                .fetch_all::<T::Remote>(T::REMOTE_PATH, &account_token)
                .await?
        };

        let mut records: Vec<Record> = Vec::with_capacity(payload.len());
        for remote in payload {
            match T::from_remote(remote, ctx, &self.resolver).await {
                Ok(entity) => records.push(entity.into()),
                Err(e @ Error::MissingNaturalKey { .. }) => warn!("Skipping record: {}", e),
                Err(e) => return Err(e),
            }
        }
        info!("Transformed {} {} from Merge API", records.len(), T::KIND);

        Ok(self.engine.upsert_many(records).await)
    }

    pub async fn import_from_csv<T: SyncEntity>(
        &self,
        path: &Path,
        ctx: &SyncContext,
    ) -> Result<SyncCounts> {
        let rows: Vec<T::CsvRow> =
            read_csv_rows(path.to_path_buf(), T::KIND.label(), T::REQUIRED_COLUMNS).await?;
        info!("Loaded CSV with {} rows", rows.len());

        let mut records: Vec<Record> = Vec::with_capacity(rows.len());
        for row in rows {
            match T::from_csv(row, ctx, &self.resolver).await {
                Ok(entity) => records.push(entity.into()),
                Err(e @ Error::MissingNaturalKey { .. }) => warn!("Skipping CSV row: {}", e),
                Err(e) => return Err(e),
            }
        }

        Ok(self.engine.upsert_many(records).await)
    }
}

/// Checks the header row for `required` columns, then decodes every row.
/// Rows that fail to decode are logged and left out.
/// Runs on the blocking pool since the csv reader does synchronous IO.
async fn read_csv_rows<R>(
    path: PathBuf,
    entity: &'static str,
    required: &'static [&'static str],
) -> Result<Vec<R>>
where
    R: DeserializeOwned + Send + 'static,
{
    tokio::task::spawn_blocking(move || -> Result<Vec<R>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(&path)?;

        let headers = reader.headers()?.clone();
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|column| !headers.iter().any(|header| header == *column))
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingColumns {
                entity: entity.to_string(),
                columns: missing.join(", "),
            });
        }

        let mut rows = Vec::new();
        for (index, row) in reader.deserialize::<R>().enumerate() {
            match row {
                Ok(row) => rows.push(row),
                Err(e) => {
                    let line = e.position().map(|pos| pos.line()).unwrap_or(index as u64 + 2);
                    warn!("Skipping unreadable {} CSV row at line {}: {}", entity, line, e);
                }
            }
        }
        Ok(rows)
    })
    .await
    .map_err(|e| Error::Internal(format!("CSV reader task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::database::memory::MemoryStore;
    use crate::models::application::Application;
    use crate::models::candidate::Candidate;
    use crate::models::job_posting::JobPosting;
    use crate::models::EntityKind;
    use reqwest::Client;
    use std::io::Write;
    use uuid::Uuid;

    fn importer(store: Arc<MemoryStore>) -> Importer {
        let config = Config::default();
        let client = Client::new();
        Importer::new(
            store,
            MergeClient::new(client.clone(), &config).unwrap(),
            TokenService::new(client, &config),
        )
    }

    fn ctx() -> SyncContext {
        SyncContext {
            user_id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
        }
    }

    fn csv_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_mode_import_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let importer = importer(store.clone());
        let ctx = ctx();

        let first = importer
            .import_from_remote::<JobPosting>(&ctx, None, true)
            .await
            .unwrap();
        assert_eq!(first, SyncCounts { inserted: 2, updated: 0 });

        let second = importer
            .import_from_remote::<JobPosting>(&ctx, None, true)
            .await
            .unwrap();
        assert_eq!(second, SyncCounts { inserted: 0, updated: 2 });
        assert_eq!(store.count(EntityKind::JobPosting).await, 2);
    }

    #[tokio::test]
    async fn live_import_without_credentials_fails_before_writing() {
        let store = Arc::new(MemoryStore::new());
        let err = importer(store.clone())
            .import_from_remote::<Candidate>(&ctx(), None, false)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing user token. Authentication required.");
        assert_eq!(store.count(EntityKind::Candidate).await, 0);
    }

    #[tokio::test]
    async fn csv_missing_required_column_fails_before_writing() {
        let store = Arc::new(MemoryStore::new());
        let file = csv_file("candidate_id,job_posting_id\nx,y\n");
        let err = importer(store.clone())
            .import_from_csv::<Application>(file.path(), &ctx())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required columns in applications CSV: status"
        );
        assert_eq!(store.count(EntityKind::Application).await, 0);
    }

    #[tokio::test]
    async fn undecodable_csv_rows_are_skipped() {
        let store = Arc::new(MemoryStore::new());
        let file = csv_file(
            "first_name,last_name,email,years_experience\n\
             Ada,Lovelace,ada@example.com,5\n\
             Alan,Turing,alan@example.com,5.0\n\
             Grace,Hopper,grace@example.com,30\n",
        );
        let counts = importer(store.clone())
            .import_from_csv::<Candidate>(file.path(), &ctx())
            .await
            .unwrap();
        assert_eq!(counts, SyncCounts { inserted: 2, updated: 0 });
        assert_eq!(store.count(EntityKind::Candidate).await, 2);
    }

    #[tokio::test]
    async fn short_csv_rows_decode_with_missing_fields() {
        let store = Arc::new(MemoryStore::new());
        let file = csv_file(
            "first_name,last_name,email\n\
             Ada,Lovelace,ada@example.com\n\
             Alan,Turing\n",
        );
        let counts = importer(store.clone())
            .import_from_csv::<Candidate>(file.path(), &ctx())
            .await
            .unwrap();
        assert_eq!(counts, SyncCounts { inserted: 2, updated: 0 });
    }

    #[tokio::test]
    async fn csv_rows_without_natural_key_are_skipped() {
        let store = Arc::new(MemoryStore::new());
        let file = csv_file(
            "first_name,last_name,email,skills\n\
             Ada,Lovelace,ada@example.com,\"Math, Engines\"\n\
             ,,,\n\
             Alan,Turing,,Logic\n",
        );
        let counts = importer(store.clone())
            .import_from_csv::<Candidate>(file.path(), &ctx())
            .await
            .unwrap();
        assert_eq!(counts, SyncCounts { inserted: 2, updated: 0 });
    }
}
