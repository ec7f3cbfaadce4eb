use async_trait::async_trait;
use tracing::warn;

use super::{explicit_id, internal_id, non_empty, SyncContext, SyncEntity};
use crate::dto::csv_dto::ApplicationCsvRow;
use crate::dto::merge_dto::MergeApplication;
use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStatus};
use crate::models::EntityKind;
use crate::services::identity_service::{
    derive_id, IdentityResolver, CSV_APPLICATION_TAG, MERGE_APPLICATION_TAG,
};
use crate::utils::time::parse_field;

#[async_trait]
impl SyncEntity for Application {
    type Remote = MergeApplication;
    type CsvRow = ApplicationCsvRow;

    const KIND: EntityKind = EntityKind::Application;
    const REMOTE_PATH: &'static str = "applications";
    const REQUIRED_COLUMNS: &'static [&'static str] = &["status"];

    fn sample_payload() -> Vec<MergeApplication> {
        vec![
            MergeApplication {
                id: Some("app-123".into()),
                candidate: Some("abc123".into()),
                job: Some("job-123".into()),
                status: Some("INTERVIEWING".into()),
                applied_at: Some("2023-03-15T00:00:00Z".into()),
                modified_at: Some("2023-03-20T00:00:00Z".into()),
                last_updated: None,
            },
            MergeApplication {
                id: Some("app-456".into()),
                candidate: Some("def456".into()),
                job: Some("job-456".into()),
                status: Some("APPLIED".into()),
                applied_at: Some("2023-04-10T00:00:00Z".into()),
                modified_at: Some("2023-04-10T00:00:00Z".into()),
                last_updated: None,
            },
        ]
    }

    async fn from_remote(
        remote: MergeApplication,
        ctx: &SyncContext,
        resolver: &IdentityResolver,
    ) -> Result<Self> {
        let merge_id = non_empty(remote.id.as_deref()).ok_or_else(|| Error::MissingNaturalKey {
            entity: EntityKind::Application.label().to_string(),
        })?;

        let merge_candidate = remote.candidate.as_deref().unwrap_or_default();
        let merge_job = remote.job.as_deref().unwrap_or_default();
        let candidate_id = resolver
            .resolve_reference(EntityKind::Candidate, merge_candidate)
            .await;
        let job_posting_id = resolver
            .resolve_reference(EntityKind::JobPosting, merge_job)
            .await;
        if candidate_id.is_none() || job_posting_id.is_none() {
            warn!(
                "Could not resolve candidate ID {} or job posting ID {} for application {}",
                merge_candidate, merge_job, merge_id
            );
        }

        let last_updated = remote
            .modified_at
            .as_deref()
            .or(remote.last_updated.as_deref());

        Ok(Application {
            id: derive_id(MERGE_APPLICATION_TAG, merge_id),
            organization_id: ctx.organization_id,
            user_id: ctx.user_id,
            created_by: ctx.user_id,
            candidate_id,
            job_posting_id,
            status: ApplicationStatus::coerce(remote.status.as_deref().unwrap_or_default()),
            applied_at: parse_field("applied_at", remote.applied_at.as_deref()),
            last_updated: parse_field("last_updated", last_updated),
        })
    }

    async fn from_csv(
        row: ApplicationCsvRow,
        ctx: &SyncContext,
        resolver: &IdentityResolver,
    ) -> Result<Self> {
        let raw_status = non_empty(row.status.as_deref())
            .unwrap_or_default()
            .to_uppercase();
        let status = ApplicationStatus::coerce(&raw_status);
        if status == ApplicationStatus::Other && raw_status != "OTHER" {
            warn!("Invalid status value '{}' - defaulting to 'OTHER'", raw_status);
        }

        let raw_candidate = non_empty(row.candidate_id.as_deref()).unwrap_or_default();
        let raw_job = non_empty(row.job_posting_id.as_deref()).unwrap_or_default();
        let natural_key = format!("{}-{}-{}", raw_candidate, raw_job, status.as_str());
        let id = explicit_id(row.id.as_deref())
            .unwrap_or_else(|| derive_id(CSV_APPLICATION_TAG, &natural_key));

        let candidate_id = match internal_id("candidate_id", Some(raw_candidate)) {
            Some(id) => resolver.verify_reference(EntityKind::Candidate, id).await,
            None => None,
        };
        let job_posting_id = match internal_id("job_posting_id", Some(raw_job)) {
            Some(id) => resolver.verify_reference(EntityKind::JobPosting, id).await,
            None => None,
        };

        Ok(Application {
            id,
            organization_id: ctx.organization_id,
            user_id: ctx.user_id,
            created_by: ctx.user_id,
            candidate_id,
            job_posting_id,
            status,
            applied_at: parse_field("applied_at", row.applied_at.as_deref()),
            last_updated: parse_field("last_updated", row.last_updated.as_deref()),
        })
    }
}
