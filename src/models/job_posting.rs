use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_JOB_STATUS: &str = "OPEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub created_by: Uuid,
    pub name: String,
    pub description: String,
    pub requirements: String,
    pub responsibilities: String,
    pub job_posting_url: String,
    pub code: String,
    pub location: String,
    pub remote: bool,
    pub status: String,
    pub hiring_manager: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
