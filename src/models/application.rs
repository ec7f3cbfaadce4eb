use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Applied,
    Interviewing,
    Offer,
    Hired,
    Rejected,
    Other,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Interviewing,
        ApplicationStatus::Offer,
        ApplicationStatus::Hired,
        ApplicationStatus::Rejected,
        ApplicationStatus::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "APPLIED",
            ApplicationStatus::Interviewing => "INTERVIEWING",
            ApplicationStatus::Offer => "OFFER",
            ApplicationStatus::Hired => "HIRED",
            ApplicationStatus::Rejected => "REJECTED",
            ApplicationStatus::Other => "OTHER",
        }
    }

    /// Exact, case-sensitive match; anything else is `Other`.
    pub fn coerce(raw: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == raw)
            .unwrap_or(ApplicationStatus::Other)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub created_by: Uuid,
    pub candidate_id: Option<Uuid>,
    pub job_posting_id: Option<Uuid>,
    pub status: ApplicationStatus,
    pub applied_at: Option<DateTime<Utc>>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// The foreign keys stored on an application row, read back when an
/// interview needs to inherit them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApplicationRefs {
    pub candidate_id: Option<Uuid>,
    pub job_posting_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_keeps_known_statuses() {
        assert_eq!(ApplicationStatus::coerce("HIRED"), ApplicationStatus::Hired);
        assert_eq!(
            ApplicationStatus::coerce("INTERVIEWING"),
            ApplicationStatus::Interviewing
        );
    }

    #[test]
    fn coerce_is_case_sensitive_and_falls_back_to_other() {
        assert_eq!(ApplicationStatus::coerce("hired"), ApplicationStatus::Other);
        assert_eq!(ApplicationStatus::coerce("WITHDRAWN"), ApplicationStatus::Other);
        assert_eq!(ApplicationStatus::coerce(""), ApplicationStatus::Other);
    }
}
