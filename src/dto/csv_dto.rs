//! Row shapes of the four CSV import formats.
//!
//! Columns are matched by header name; columns not listed here are ignored
//! and empty cells decode as `None`.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CandidateCsvRow {
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub current_title: Option<String>,
    /// Comma-separated.
    pub skills: Option<String>,
    /// Comma-separated, most recent first.
    pub past_titles: Option<String>,
    pub years_experience: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JobPostingCsvRow {
    pub id: Option<String>,
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    pub job_posting_url: Option<String>,
    pub location: Option<String>,
    pub remote: Option<String>,
    pub status: Option<String>,
    pub hiring_manager: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApplicationCsvRow {
    pub id: Option<String>,
    pub candidate_id: Option<String>,
    pub job_posting_id: Option<String>,
    pub status: Option<String>,
    pub applied_at: Option<String>,
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InterviewCsvRow {
    pub id: Option<String>,
    pub application_id: Option<String>,
    pub job_id: Option<String>,
    pub interview_date: Option<String>,
    pub interviewer: Option<String>,
    pub interview_type: Option<String>,
    pub result: Option<String>,
    pub feedback: Option<String>,
    pub location: Option<String>,
    pub remote_created_at: Option<String>,
}
