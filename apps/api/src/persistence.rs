//! Best-effort capture of raw submissions.
//!
//! Resume generation never waits on or fails because of this module: inserts run
//! on a detached task and every error stops at the task boundary.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::models::submission::{PersistedRecord, Submission};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Insert-only record store. Carried in `AppState` as `Arc<dyn SubmissionStore>`.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn insert(&self, record: &PersistedRecord) -> Result<(), StoreError>;
}

/// PostgreSQL-backed store writing to `resume_submissions`.
#[derive(Clone)]
pub struct PgSubmissionStore {
    pool: PgPool,
}

impl PgSubmissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubmissionStore for PgSubmissionStore {
    async fn insert(&self, record: &PersistedRecord) -> Result<(), StoreError> {
        let s = &record.submission;
        sqlx::query(
            r#"
            INSERT INTO resume_submissions
                (name, email, phone, linkedin, college, degree, year,
                 skills, projects, achievements, experience, company, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(&s.name)
        .bind(&s.email)
        .bind(&s.phone)
        .bind(&s.linkedin)
        .bind(&s.college)
        .bind(&s.degree)
        .bind(&s.year)
        .bind(&s.skills)
        .bind(&s.projects)
        .bind(&s.achievements)
        .bind(&s.experience)
        .bind(&s.company)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// Stamps and stores a submission on a detached task.
///
/// The returned handle is never awaited by the request path. With no store
/// configured the task only logs a warning.
pub fn record_submission(
    store: Option<Arc<dyn SubmissionStore>>,
    submission: Submission,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let Some(store) = store else {
            warn!("Submission store not initialized. User data was NOT saved.");
            return;
        };

        let record = PersistedRecord::stamp(submission);
        let name = record.submission.name.clone().unwrap_or_default();
        match store.insert(&record).await {
            Ok(()) => info!("Submission for {name} saved"),
            Err(e) => error!("Failed to save submission for {name}: {e}"),
        }
    })
}
