pub mod application;
pub mod candidate;
pub mod interview;
pub mod job_posting;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use self::application::Application;
use self::candidate::Candidate;
use self::interview::Interview;
use self::job_posting::JobPosting;

/// The four synced entity types, one backend table each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Candidate,
    JobPosting,
    Application,
    Interview,
}

impl EntityKind {
    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Candidate => "candidates",
            EntityKind::JobPosting => "job_postings",
            EntityKind::Application => "applications",
            EntityKind::Interview => "interviews",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Candidate => "candidates",
            EntityKind::JobPosting => "job postings",
            EntityKind::Application => "applications",
            EntityKind::Interview => "interviews",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A transformed row ready for the upsert engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Candidate(Candidate),
    JobPosting(JobPosting),
    Application(Application),
    Interview(Interview),
}

impl Record {
    pub fn kind(&self) -> EntityKind {
        match self {
            Record::Candidate(_) => EntityKind::Candidate,
            Record::JobPosting(_) => EntityKind::JobPosting,
            Record::Application(_) => EntityKind::Application,
            Record::Interview(_) => EntityKind::Interview,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Record::Candidate(c) => c.id,
            Record::JobPosting(j) => j.id,
            Record::Application(a) => a.id,
            Record::Interview(i) => i.id,
        }
    }

    pub fn set_id(&mut self, id: Uuid) {
        match self {
            Record::Candidate(c) => c.id = id,
            Record::JobPosting(j) => j.id = id,
            Record::Application(a) => a.id = id,
            Record::Interview(i) => i.id = id,
        }
    }

    /// Short human-readable tag used in log lines.
    pub fn label(&self) -> String {
        match self {
            Record::Candidate(c) => c.name.clone(),
            Record::JobPosting(j) => j.name.clone(),
            Record::Application(a) => format!("Status: {}", a.status.as_str()),
            Record::Interview(i) => format!("Status: {}", i.status.as_str()),
        }
    }

    /// Fills creation and freshness timestamps that the source left empty.
    pub fn stamp_inserted(&mut self, now: DateTime<Utc>) {
        match self {
            Record::Candidate(c) => {
                c.created_at.get_or_insert(now);
                c.modified_at.get_or_insert(now);
            }
            Record::JobPosting(j) => {
                j.created_at.get_or_insert(now);
                j.updated_at.get_or_insert(now);
            }
            Record::Application(a) => {
                a.applied_at.get_or_insert(now);
                a.last_updated.get_or_insert(now);
            }
            Record::Interview(i) => {
                i.date.get_or_insert(now);
                i.created_at.get_or_insert(now);
            }
        }
    }

    /// Refreshes the freshness timestamp. Interviews carry none.
    pub fn stamp_updated(&mut self, now: DateTime<Utc>) {
        match self {
            Record::Candidate(c) => c.modified_at = Some(now),
            Record::JobPosting(j) => j.updated_at = Some(now),
            Record::Application(a) => a.last_updated = Some(now),
            Record::Interview(_) => {}
        }
    }
}

impl From<Candidate> for Record {
    fn from(value: Candidate) -> Self {
        Record::Candidate(value)
    }
}

impl From<JobPosting> for Record {
    fn from(value: JobPosting) -> Self {
        Record::JobPosting(value)
    }
}

impl From<Application> for Record {
    fn from(value: Application) -> Self {
        Record::Application(value)
    }
}

impl From<Interview> for Record {
    fn from(value: Interview) -> Self {
        Record::Interview(value)
    }
}
