use async_trait::async_trait;

use super::{explicit_id, full_name, non_empty, split_list, text, SyncContext, SyncEntity};
use crate::dto::csv_dto::CandidateCsvRow;
use crate::dto::merge_dto::{MergeCandidate, MergeEmail, MergePhoneNumber};
use crate::error::{Error, Result};
use crate::models::candidate::{
    Candidate, DEFAULT_CANDIDATE_STATUS, DEFAULT_IMAGE_URL, DEFAULT_PREVIOUS_ROLE,
};
use crate::models::EntityKind;
use crate::services::identity_service::{
    derive_id, IdentityResolver, CSV_CANDIDATE_TAG, MERGE_CANDIDATE_TAG,
};

fn previous_role(past_titles: &[String]) -> String {
    past_titles
        .first()
        .cloned()
        .unwrap_or_else(|| DEFAULT_PREVIOUS_ROLE.to_string())
}

fn missing_key() -> Error {
    Error::MissingNaturalKey {
        entity: EntityKind::Candidate.label().to_string(),
    }
}

#[async_trait]
impl SyncEntity for Candidate {
    type Remote = MergeCandidate;
    type CsvRow = CandidateCsvRow;

    const KIND: EntityKind = EntityKind::Candidate;
    const REMOTE_PATH: &'static str = "candidates";
    const REQUIRED_COLUMNS: &'static [&'static str] = &["first_name", "last_name"];

    fn sample_payload() -> Vec<MergeCandidate> {
        fn primary(value: &str) -> MergeEmail {
            MergeEmail {
                email_type: Some("primary".into()),
                value: Some(value.into()),
            }
        }

        vec![
            MergeCandidate {
                remote_id: Some("test123".into()),
                first_name: Some("John".into()),
                last_name: Some("Test".into()),
                emails: vec![primary("john.test@example.com")],
                phone_numbers: vec![MergePhoneNumber {
                    phone_type: Some("primary".into()),
                    value: Some("123-456-7890".into()),
                }],
                current_title: Some("Software Engineer".into()),
                current_company: Some("Test Company".into()),
                resume_url: Some("https://example.com/resume.pdf".into()),
                skills: vec!["Python".into(), "JavaScript".into(), "SQL".into()],
                years_experience: Some(5),
                past_titles: vec!["Junior Developer".into(), "Developer".into()],
            },
            MergeCandidate {
                remote_id: Some("test456".into()),
                first_name: Some("Jane".into()),
                last_name: Some("Sample".into()),
                emails: vec![primary("jane.sample@example.com")],
                phone_numbers: vec![MergePhoneNumber {
                    phone_type: Some("primary".into()),
                    value: Some("234-567-8901".into()),
                }],
                current_title: Some("Product Manager".into()),
                current_company: Some("Sample Inc".into()),
                resume_url: Some("https://example.com/resume2.pdf".into()),
                skills: vec!["Product Management".into(), "Agile".into(), "UX".into()],
                years_experience: Some(7),
                past_titles: vec!["Associate PM".into(), "Business Analyst".into()],
            },
        ]
    }

    async fn from_remote(
        remote: MergeCandidate,
        ctx: &SyncContext,
        _resolver: &IdentityResolver,
    ) -> Result<Self> {
        let remote_id = non_empty(remote.remote_id.as_deref()).ok_or_else(missing_key)?;

        Ok(Candidate {
            id: derive_id(MERGE_CANDIDATE_TAG, remote_id),
            organization_id: ctx.organization_id,
            created_by: ctx.user_id,
            name: full_name(remote.first_name.as_deref(), remote.last_name.as_deref()),
            role: text(remote.current_title),
            previous_role: previous_role(&remote.past_titles),
            skills: remote.skills,
            experience: remote.years_experience,
            status: DEFAULT_CANDIDATE_STATUS.to_string(),
            image_url: DEFAULT_IMAGE_URL.to_string(),
            created_at: None,
            modified_at: None,
        })
    }

    async fn from_csv(
        row: CandidateCsvRow,
        ctx: &SyncContext,
        _resolver: &IdentityResolver,
    ) -> Result<Self> {
        let name = full_name(row.first_name.as_deref(), row.last_name.as_deref());
        let natural_key = non_empty(row.email.as_deref())
            .map(str::to_string)
            .or_else(|| (!name.is_empty()).then(|| name.clone()))
            .ok_or_else(missing_key)?;
        let id = explicit_id(row.id.as_deref())
            .unwrap_or_else(|| derive_id(CSV_CANDIDATE_TAG, &natural_key));

        let past_titles = split_list(row.past_titles.as_deref());
        Ok(Candidate {
            id,
            organization_id: ctx.organization_id,
            created_by: ctx.user_id,
            name,
            role: text(row.current_title),
            skills: split_list(row.skills.as_deref()),
            experience: row.years_experience,
            previous_role: previous_role(&past_titles),
            status: DEFAULT_CANDIDATE_STATUS.to_string(),
            image_url: DEFAULT_IMAGE_URL.to_string(),
            created_at: None,
            modified_at: None,
        })
    }
}
