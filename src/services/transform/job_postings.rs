use async_trait::async_trait;

use super::{explicit_id, non_empty, parse_flag, text, SyncContext, SyncEntity};
use crate::dto::csv_dto::JobPostingCsvRow;
use crate::dto::merge_dto::MergeJobPosting;
use crate::error::{Error, Result};
use crate::models::job_posting::{JobPosting, DEFAULT_JOB_STATUS};
use crate::models::EntityKind;
use crate::services::identity_service::{derive_id, IdentityResolver, CSV_JOB_TAG, MERGE_JOB_TAG};
use crate::utils::time::parse_field;

fn missing_key() -> Error {
    Error::MissingNaturalKey {
        entity: EntityKind::JobPosting.label().to_string(),
    }
}

fn status_or_default(status: Option<String>) -> String {
    non_empty(status.as_deref())
        .unwrap_or(DEFAULT_JOB_STATUS)
        .to_string()
}

#[async_trait]
impl SyncEntity for JobPosting {
    type Remote = MergeJobPosting;
    type CsvRow = JobPostingCsvRow;

    const KIND: EntityKind = EntityKind::JobPosting;
    const REMOTE_PATH: &'static str = "job-postings";
    const REQUIRED_COLUMNS: &'static [&'static str] = &["name"];

    fn sample_payload() -> Vec<MergeJobPosting> {
        vec![
            MergeJobPosting {
                id: Some("job-123".into()),
                name: Some("Senior Software Engineer".into()),
                description: Some("We're looking for a Senior Software Engineer with expertise in Python and cloud technologies.".into()),
                requirements: Some("5+ years experience with Python, AWS, and distributed systems.".into()),
                responsibilities: Some("Design, develop, and maintain cloud-based applications and APIs.".into()),
                job_posting_url: Some("https://example.com/jobs/senior-engineer".into()),
                code: Some("ENG-123".into()),
                location: Some("San Francisco, CA".into()),
                remote: Some(true),
                status: Some("OPEN".into()),
                hiring_manager: Some("Jane Smith".into()),
                created_at: Some("2023-01-15T00:00:00Z".into()),
                modified_at: Some("2023-01-20T00:00:00Z".into()),
                updated_at: None,
            },
            MergeJobPosting {
                id: Some("job-456".into()),
                name: Some("Product Manager".into()),
                description: Some("We're seeking a Product Manager to lead our new initiative.".into()),
                requirements: Some("3+ years of product management experience in SaaS.".into()),
                responsibilities: Some("Define product vision, strategy, and roadmap.".into()),
                job_posting_url: Some("https://example.com/jobs/product-manager".into()),
                code: Some("PM-456".into()),
                location: Some("New York, NY".into()),
                remote: Some(true),
                status: Some("OPEN".into()),
                hiring_manager: Some("John Doe".into()),
                created_at: Some("2023-02-10T00:00:00Z".into()),
                modified_at: Some("2023-02-15T00:00:00Z".into()),
                updated_at: None,
            },
        ]
    }

    async fn from_remote(
        remote: MergeJobPosting,
        ctx: &SyncContext,
        _resolver: &IdentityResolver,
    ) -> Result<Self> {
        let merge_id = non_empty(remote.id.as_deref()).ok_or_else(missing_key)?;
        let updated_at = remote.modified_at.as_deref().or(remote.updated_at.as_deref());

        Ok(JobPosting {
            id: derive_id(MERGE_JOB_TAG, merge_id),
            organization_id: ctx.organization_id,
            user_id: ctx.user_id,
            created_by: ctx.user_id,
            created_at: parse_field("created_at", remote.created_at.as_deref()),
            updated_at: parse_field("updated_at", updated_at),
            name: text(remote.name),
            description: text(remote.description),
            requirements: text(remote.requirements),
            responsibilities: text(remote.responsibilities),
            job_posting_url: text(remote.job_posting_url),
            code: text(remote.code),
            location: text(remote.location),
            remote: remote.remote.unwrap_or(false),
            status: status_or_default(remote.status),
            hiring_manager: text(remote.hiring_manager),
        })
    }

    async fn from_csv(
        row: JobPostingCsvRow,
        ctx: &SyncContext,
        _resolver: &IdentityResolver,
    ) -> Result<Self> {
        let name = text(row.name);
        if name.is_empty() {
            return Err(missing_key());
        }
        let code = text(row.code);
        let id = explicit_id(row.id.as_deref())
            .unwrap_or_else(|| derive_id(CSV_JOB_TAG, &format!("{}-{}", name, code)));

        Ok(JobPosting {
            id,
            organization_id: ctx.organization_id,
            user_id: ctx.user_id,
            created_by: ctx.user_id,
            remote: parse_flag(row.remote.as_deref()),
            created_at: parse_field("created_at", row.created_at.as_deref()),
            updated_at: parse_field("updated_at", row.updated_at.as_deref()),
            name,
            code,
            description: text(row.description),
            requirements: text(row.requirements),
            responsibilities: text(row.responsibilities),
            job_posting_url: text(row.job_posting_url),
            location: text(row.location),
            status: status_or_default(row.status),
            hiring_manager: text(row.hiring_manager),
        })
    }
}
