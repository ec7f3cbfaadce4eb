use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterviewStatus {
    Passed,
    Failed,
    Pending,
    Canceled,
    NoShow,
    Other,
}

impl InterviewStatus {
    pub const ALL: [InterviewStatus; 6] = [
        InterviewStatus::Passed,
        InterviewStatus::Failed,
        InterviewStatus::Pending,
        InterviewStatus::Canceled,
        InterviewStatus::NoShow,
        InterviewStatus::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewStatus::Passed => "PASSED",
            InterviewStatus::Failed => "FAILED",
            InterviewStatus::Pending => "PENDING",
            InterviewStatus::Canceled => "CANCELED",
            InterviewStatus::NoShow => "NO_SHOW",
            InterviewStatus::Other => "OTHER",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == raw)
    }

    /// Exact, case-sensitive match; anything else is `Other`.
    pub fn coerce(raw: &str) -> Self {
        Self::parse(raw).unwrap_or(InterviewStatus::Other)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interview {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub created_by: Uuid,
    pub candidate_id: Option<Uuid>,
    pub job_id: Option<Uuid>,
    pub date: Option<DateTime<Utc>>,
    /// `HH:MM` of the interview start.
    pub time: Option<String>,
    pub status: InterviewStatus,
    pub notes: String,
    pub created_at: Option<DateTime<Utc>>,
    pub calendar_event_id: Option<String>,
}
