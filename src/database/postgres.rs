use async_trait::async_trait;
use sqlx::{Executor, PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::database::store::RecordStore;
use crate::error::Result;
use crate::models::application::{Application, ApplicationRefs};
use crate::models::candidate::Candidate;
use crate::models::interview::Interview;
use crate::models::job_posting::JobPosting;
use crate::models::{EntityKind, Record};

const SCHEMA_SQL: &str = include_str!("../../schema/sync_tables.sql");

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies `schema/sync_tables.sql`. Every statement is `IF NOT EXISTS`,
    /// so running it against a populated database is a no-op.
    pub async fn ensure_schema(&self) -> Result<()> {
        self.pool.execute(SCHEMA_SQL).await?;
        info!("Sync tables are present");
        Ok(())
    }

    async fn insert_candidate(&self, c: &Candidate) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO candidates (
                id, organization_id, created_by, name, role, skills, experience,
                previous_role, status, image_url, created_at, modified_at
            ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12)
            "#,
        )
        .bind(c.id)
        .bind(c.organization_id)
        .bind(c.created_by)
        .bind(&c.name)
        .bind(&c.role)
        .bind(&c.skills)
        .bind(c.experience)
        .bind(&c.previous_role)
        .bind(&c.status)
        .bind(&c.image_url)
        .bind(c.created_at)
        .bind(c.modified_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_candidate(&self, c: &Candidate) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE candidates
            SET
                organization_id = $2,
                created_by = $3,
                name = $4,
                role = $5,
                skills = $6,
                experience = $7,
                previous_role = $8,
                status = $9,
                image_url = $10,
                created_at = COALESCE($11, created_at),
                modified_at = $12
            WHERE id = $1
            "#,
        )
        .bind(c.id)
        .bind(c.organization_id)
        .bind(c.created_by)
        .bind(&c.name)
        .bind(&c.role)
        .bind(&c.skills)
        .bind(c.experience)
        .bind(&c.previous_role)
        .bind(&c.status)
        .bind(&c.image_url)
        .bind(c.created_at)
        .bind(c.modified_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_job_posting(&self, j: &JobPosting) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO job_postings (
                id, organization_id, user_id, created_by, name, description,
                requirements, responsibilities, job_posting_url, code, location,
                remote, status, hiring_manager, created_at, updated_at
            ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16)
            "#,
        )
        .bind(j.id)
        .bind(j.organization_id)
        .bind(j.user_id)
        .bind(j.created_by)
        .bind(&j.name)
        .bind(&j.description)
        .bind(&j.requirements)
        .bind(&j.responsibilities)
        .bind(&j.job_posting_url)
        .bind(&j.code)
        .bind(&j.location)
        .bind(j.remote)
        .bind(&j.status)
        .bind(&j.hiring_manager)
        .bind(j.created_at)
        .bind(j.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_job_posting(&self, j: &JobPosting) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE job_postings
            SET
                organization_id = $2,
                user_id = $3,
                created_by = $4,
                name = $5,
                description = $6,
                requirements = $7,
                responsibilities = $8,
                job_posting_url = $9,
                code = $10,
                location = $11,
                remote = $12,
                status = $13,
                hiring_manager = $14,
                created_at = COALESCE($15, created_at),
                updated_at = $16
            WHERE id = $1
            "#,
        )
        .bind(j.id)
        .bind(j.organization_id)
        .bind(j.user_id)
        .bind(j.created_by)
        .bind(&j.name)
        .bind(&j.description)
        .bind(&j.requirements)
        .bind(&j.responsibilities)
        .bind(&j.job_posting_url)
        .bind(&j.code)
        .bind(&j.location)
        .bind(j.remote)
        .bind(&j.status)
        .bind(&j.hiring_manager)
        .bind(j.created_at)
        .bind(j.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_application(&self, a: &Application) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO applications (
                id, organization_id, user_id, created_by, candidate_id,
                job_posting_id, status, applied_at, last_updated
            ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)
            "#,
        )
        .bind(a.id)
        .bind(a.organization_id)
        .bind(a.user_id)
        .bind(a.created_by)
        .bind(a.candidate_id)
        .bind(a.job_posting_id)
        .bind(a.status.as_str())
        .bind(a.applied_at)
        .bind(a.last_updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_application(&self, a: &Application) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE applications
            SET
                organization_id = $2,
                user_id = $3,
                created_by = $4,
                candidate_id = COALESCE($5, candidate_id),
                job_posting_id = COALESCE($6, job_posting_id),
                status = $7,
                applied_at = COALESCE($8, applied_at),
                last_updated = $9
            WHERE id = $1
            "#,
        )
        .bind(a.id)
        .bind(a.organization_id)
        .bind(a.user_id)
        .bind(a.created_by)
        .bind(a.candidate_id)
        .bind(a.job_posting_id)
        .bind(a.status.as_str())
        .bind(a.applied_at)
        .bind(a.last_updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_interview(&self, i: &Interview) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO interviews (
                id, organization_id, created_by, candidate_id, job_id, date, time,
                status, notes, created_at, calendar_event_id
            ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11)
            "#,
        )
        .bind(i.id)
        .bind(i.organization_id)
        .bind(i.created_by)
        .bind(i.candidate_id)
        .bind(i.job_id)
        .bind(i.date)
        .bind(&i.time)
        .bind(i.status.as_str())
        .bind(&i.notes)
        .bind(i.created_at)
        .bind(&i.calendar_event_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_interview(&self, i: &Interview) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE interviews
            SET
                organization_id = $2,
                created_by = $3,
                candidate_id = COALESCE($4, candidate_id),
                job_id = COALESCE($5, job_id),
                date = COALESCE($6, date),
                time = $7,
                status = $8,
                notes = $9,
                created_at = COALESCE($10, created_at),
                calendar_event_id = COALESCE($11, calendar_event_id)
            WHERE id = $1
            "#,
        )
        .bind(i.id)
        .bind(i.organization_id)
        .bind(i.created_by)
        .bind(i.candidate_id)
        .bind(i.job_id)
        .bind(i.date)
        .bind(&i.time)
        .bind(i.status.as_str())
        .bind(&i.notes)
        .bind(i.created_at)
        .bind(&i.calendar_event_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn exists(&self, kind: EntityKind, id: Uuid) -> Result<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)",
            kind.table()
        );
        let found: bool = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(found)
    }

    async fn insert(&self, record: &Record) -> Result<()> {
        match record {
            Record::Candidate(c) => self.insert_candidate(c).await,
            Record::JobPosting(j) => self.insert_job_posting(j).await,
            Record::Application(a) => self.insert_application(a).await,
            Record::Interview(i) => self.insert_interview(i).await,
        }
    }

    async fn update(&self, record: &Record) -> Result<()> {
        match record {
            Record::Candidate(c) => self.update_candidate(c).await,
            Record::JobPosting(j) => self.update_job_posting(j).await,
            Record::Application(a) => self.update_application(a).await,
            Record::Interview(i) => self.update_interview(i).await,
        }
    }

    async fn application_refs(&self, id: Uuid) -> Result<Option<ApplicationRefs>> {
        let row = sqlx::query("SELECT candidate_id, job_posting_id FROM applications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| -> Result<ApplicationRefs> {
            Ok(ApplicationRefs {
                candidate_id: row.try_get("candidate_id")?,
                job_posting_id: row.try_get("job_posting_id")?,
            })
        })
        .transpose()
    }
}
