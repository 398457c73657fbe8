use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::matcher::AnalysisResult;

/// One row of `analysis_results`. Written once, never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub job_description: String,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub score: i16,
    pub scoring_policy: String,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn from_result(job_description: &str, result: &AnalysisResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_description: job_description.to_string(),
            matched_skills: result.matched_skills.clone(),
            missing_skills: result.missing_skills.clone(),
            score: i16::from(result.score),
            scoring_policy: result.policy.to_string(),
            created_at: Utc::now(),
        }
    }
}
