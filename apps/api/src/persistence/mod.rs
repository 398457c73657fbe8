//! Persistence Sink — append-only storage for analysis results.
//!
//! `AppState` holds an `Arc<dyn AnalysisSink>`: `PgAnalysisSink` when
//! `DATABASE_URL` is configured, `DisabledSink` otherwise.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::analysis::AnalysisRecord;

#[async_trait]
pub trait AnalysisSink: Send + Sync {
    /// Appends one record. Returns the stored id, or `None` if this sink keeps nothing.
    async fn record(&self, record: &AnalysisRecord) -> Result<Option<Uuid>, AppError>;
}

pub struct PgAnalysisSink {
    pool: PgPool,
}

impl PgAnalysisSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalysisSink for PgAnalysisSink {
    async fn record(&self, record: &AnalysisRecord) -> Result<Option<Uuid>, AppError> {
        sqlx::query(
            r#"
            INSERT INTO analysis_results
                (id, job_description, matched_skills, missing_skills, score, scoring_policy, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.id)
        .bind(&record.job_description)
        .bind(&record.matched_skills)
        .bind(&record.missing_skills)
        .bind(record.score)
        .bind(&record.scoring_policy)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        info!("Saved analysis {} (score {})", record.id, record.score);
        Ok(Some(record.id))
    }
}

/// Used when no database is configured.
pub struct DisabledSink;

#[async_trait]
impl AnalysisSink for DisabledSink {
    async fn record(&self, record: &AnalysisRecord) -> Result<Option<Uuid>, AppError> {
        debug!("Persistence disabled; analysis {} not stored", record.id);
        Ok(None)
    }
}
