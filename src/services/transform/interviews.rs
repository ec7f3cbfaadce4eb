use async_trait::async_trait;
use tracing::warn;

use super::{explicit_id, internal_id, non_empty, SyncContext, SyncEntity};
use crate::dto::csv_dto::InterviewCsvRow;
use crate::dto::merge_dto::MergeInterview;
use crate::error::{Error, Result};
use crate::models::application::ApplicationRefs;
use crate::models::interview::{Interview, InterviewStatus};
use crate::models::EntityKind;
use crate::services::identity_service::{
    derive_id, IdentityResolver, CSV_INTERVIEW_TAG, MERGE_INTERVIEW_TAG,
};
use crate::utils::time::{parse_field, start_fields};

fn missing_key() -> Error {
    Error::MissingNaturalKey {
        entity: EntityKind::Interview.label().to_string(),
    }
}

/// Feedback first, then one labelled line per detail that is present.
fn compose_notes(
    feedback: Option<&str>,
    location: Option<&str>,
    interviewer: Option<&str>,
    interview_type: Option<&str>,
) -> String {
    let mut lines = Vec::new();
    if let Some(feedback) = non_empty(feedback) {
        lines.push(feedback.to_string());
    }
    for (label, value) in [
        ("Location", location),
        ("Interviewer", interviewer),
        ("Type", interview_type),
    ] {
        if let Some(value) = non_empty(value) {
            lines.push(format!("{}: {}", label, value));
        }
    }
    lines.join("\n")
}

fn remote_status(result: Option<&str>, status: Option<&str>) -> InterviewStatus {
    match result.and_then(InterviewStatus::parse) {
        Some(status) => status,
        None if status == Some("SCHEDULED") => InterviewStatus::Pending,
        None => InterviewStatus::Other,
    }
}

#[async_trait]
impl SyncEntity for Interview {
    type Remote = MergeInterview;
    type CsvRow = InterviewCsvRow;

    const KIND: EntityKind = EntityKind::Interview;
    const REMOTE_PATH: &'static str = "interviews";
    const REQUIRED_COLUMNS: &'static [&'static str] = &["application_id", "interview_date"];

    fn sample_payload() -> Vec<MergeInterview> {
        vec![
            MergeInterview {
                id: Some("interview-123".into()),
                application: Some("app-123".into()),
                interviewer: Some("John Smith".into()),
                organizer: Some("HR Department".into()),
                status: Some("SCHEDULED".into()),
                start_time: Some("2023-06-15T10:00:00Z".into()),
                end_time: Some("2023-06-15T11:00:00Z".into()),
                location: Some("Virtual - Zoom".into()),
                interview_type: Some("VIRTUAL".into()),
                result: Some("PENDING".into()),
                feedback: None,
                remote_created_at: Some("2023-06-01T10:00:00Z".into()),
                remote_updated_at: Some("2023-06-01T10:00:00Z".into()),
            },
            MergeInterview {
                id: Some("interview-456".into()),
                application: Some("app-456".into()),
                interviewer: Some("Sarah Johnson".into()),
                organizer: Some("Engineering Team".into()),
                status: Some("COMPLETED".into()),
                start_time: Some("2023-05-20T13:00:00Z".into()),
                end_time: Some("2023-05-20T14:30:00Z".into()),
                location: Some("Onsite - Conference Room A".into()),
                interview_type: Some("TECHNICAL".into()),
                result: Some("PASSED".into()),
                feedback: Some("Great technical skills and problem-solving abilities.".into()),
                remote_created_at: Some("2023-05-15T09:00:00Z".into()),
                remote_updated_at: Some("2023-05-20T15:00:00Z".into()),
            },
        ]
    }

    async fn from_remote(
        remote: MergeInterview,
        ctx: &SyncContext,
        resolver: &IdentityResolver,
    ) -> Result<Self> {
        let merge_id = non_empty(remote.id.as_deref()).ok_or_else(missing_key)?;
        let merge_application = remote.application.as_deref().unwrap_or_default();

        let refs = resolver
            .resolve_application(merge_application)
            .await
            .unwrap_or_default();
        if refs.candidate_id.is_none() || refs.job_posting_id.is_none() {
            warn!("Could not resolve application info for {}", merge_application);
        }

        let (date, time) = start_fields("start_time", remote.start_time.as_deref());
        Ok(Interview {
            id: derive_id(MERGE_INTERVIEW_TAG, merge_id),
            organization_id: ctx.organization_id,
            created_by: ctx.user_id,
            candidate_id: refs.candidate_id,
            job_id: refs.job_posting_id,
            date,
            time,
            status: remote_status(remote.result.as_deref(), remote.status.as_deref()),
            notes: compose_notes(
                remote.feedback.as_deref(),
                remote.location.as_deref(),
                remote.interviewer.as_deref(),
                remote.interview_type.as_deref(),
            ),
            created_at: parse_field("remote_created_at", remote.remote_created_at.as_deref()),
            calendar_event_id: Some(merge_id.to_string()),
        })
    }

    async fn from_csv(
        row: InterviewCsvRow,
        ctx: &SyncContext,
        resolver: &IdentityResolver,
    ) -> Result<Self> {
        let raw_application = non_empty(row.application_id.as_deref()).unwrap_or_default();
        let raw_date = non_empty(row.interview_date.as_deref()).unwrap_or_default();
        if raw_application.is_empty() && raw_date.is_empty() {
            return Err(missing_key());
        }
        let interview_type = non_empty(row.interview_type.as_deref()).map(str::to_uppercase);
        let natural_key = format!(
            "{}-{}-{}",
            raw_application,
            raw_date,
            interview_type.as_deref().unwrap_or_default()
        );
        let id = explicit_id(row.id.as_deref())
            .unwrap_or_else(|| derive_id(CSV_INTERVIEW_TAG, &natural_key));

        let refs = match internal_id("application_id", Some(raw_application)) {
            Some(application_id) => resolver
                .application_refs(application_id)
                .await
                .unwrap_or_default(),
            None => ApplicationRefs::default(),
        };
        let job_id = match internal_id("job_id", row.job_id.as_deref()) {
            Some(job_id) => resolver.verify_reference(EntityKind::JobPosting, job_id).await,
            None => refs.job_posting_id,
        };

        let result = non_empty(row.result.as_deref())
            .unwrap_or_default()
            .to_uppercase();
        let (date, time) = start_fields("interview_date", Some(raw_date));

        Ok(Interview {
            id,
            organization_id: ctx.organization_id,
            created_by: ctx.user_id,
            candidate_id: refs.candidate_id,
            job_id,
            date,
            time,
            status: InterviewStatus::coerce(&result),
            notes: compose_notes(
                row.feedback.as_deref(),
                row.location.as_deref(),
                row.interviewer.as_deref(),
                interview_type.as_deref(),
            ),
            created_at: parse_field("remote_created_at", row.remote_created_at.as_deref()),
            calendar_event_id: None,
        })
    }
}
