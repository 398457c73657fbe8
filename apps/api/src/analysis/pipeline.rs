//! Analysis pipeline — one request in, one complete result out.
//!
//! Flow: validate → extract text → match skills → build timeline →
//!       feedback (optional) → persist (optional) → respond.
//!
//! Feedback and persistence failures do not fail the analysis; they are
//! reported back as notices alongside the result.

use bytes::Bytes;
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::analysis::feedback::{select_feedback, FeedbackInput, FeedbackMode, FeedbackReport};
use crate::analysis::matcher::{analyze_skills, AnalysisResult};
use crate::analysis::timeline::{build_timeline, TimelineEntry};
use crate::errors::AppError;
use crate::models::analysis::AnalysisRecord;
use crate::state::AppState;

/// Where the resume text comes from.
#[derive(Debug, Clone)]
pub enum ResumeSource {
    Pdf(Bytes),
    /// Already-extracted text; lowercased like extractor output.
    Text(String),
}

#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub resume: Option<ResumeSource>,
    pub job_description: String,
    pub feedback: FeedbackMode,
    /// Per-request credential for delegated feedback. Never stored.
    pub api_key: Option<String>,
    pub save: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    /// Id of the stored record, when persistence is enabled and succeeded.
    pub analysis_id: Option<Uuid>,
    pub result: AnalysisResult,
    pub timeline: Vec<TimelineEntry>,
    /// True when nothing is missing.
    pub fully_ready: bool,
    pub feedback: Option<FeedbackReport>,
    pub saved: bool,
    /// Recoverable problems the user should know about.
    pub notices: Vec<String>,
    /// Length of the extracted resume text, useful for spotting failed extraction.
    pub resume_chars: usize,
}

pub async fn run_analysis(
    state: &AppState,
    request: AnalysisRequest,
) -> Result<AnalysisResponse, AppError> {
    let AnalysisRequest {
        resume,
        job_description,
        feedback,
        api_key,
        save,
    } = request;

    let resume = validate(resume, &job_description)?;
    let resume_text = resume_text(state, resume).await;
    let mut notices = Vec::new();

    if resume_text.trim().is_empty() {
        notices.push(
            "No text could be read from the resume; every required skill is reported as missing."
                .to_string(),
        );
    }

    let result = analyze_skills(
        &resume_text,
        &job_description,
        state.config.scoring_policy,
        state.config.match_mode,
    );
    info!(
        "Analysis: score={} matched={} missing={} policy={}",
        result.score,
        result.matched_skills.len(),
        result.missing_skills.len(),
        result.policy
    );

    let timeline = build_timeline(&result.missing_skills);
    let fully_ready = timeline.is_empty();

    let credential = api_key
        .filter(|k| !k.trim().is_empty())
        .or_else(|| state.config.anthropic_api_key.clone());

    let feedback = match select_feedback(
        feedback,
        credential,
        &state.http,
        &state.config.anthropic_api_url,
    ) {
        Some(generator) => {
            let input = FeedbackInput {
                resume_text: &resume_text,
                job_description: &job_description,
                matched: &result.matched_skills,
                missing: &result.missing_skills,
            };
            match generator.generate(&input).await {
                Ok(report) => Some(report),
                Err(e) => {
                    error!("Feedback failed: {e}");
                    notices.push(e.user_message());
                    None
                }
            }
        }
        None => None,
    };

    let mut analysis_id = None;
    if save {
        let record = AnalysisRecord::from_result(&job_description, &result);
        match state.sink.record(&record).await {
            Ok(id) => analysis_id = id,
            Err(e) => {
                error!("Persisting analysis failed: {e}");
                notices.push(e.user_message());
            }
        }
    }

    Ok(AnalysisResponse {
        analysis_id,
        saved: analysis_id.is_some(),
        result,
        timeline,
        fully_ready,
        feedback,
        notices,
        resume_chars: resume_text.chars().count(),
    })
}

fn validate(
    resume: Option<ResumeSource>,
    job_description: &str,
) -> Result<ResumeSource, AppError> {
    let resume = match resume {
        Some(ResumeSource::Pdf(bytes)) if bytes.is_empty() => None,
        Some(ResumeSource::Text(text)) if text.trim().is_empty() => None,
        other => other,
    };
    let resume = resume.ok_or_else(|| {
        AppError::Validation("Please upload a resume and paste a job description.".to_string())
    })?;
    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Please upload a resume and paste a job description.".to_string(),
        ));
    }
    Ok(resume)
}

async fn resume_text(state: &AppState, resume: ResumeSource) -> String {
    match resume {
        ResumeSource::Text(text) => text.to_lowercase(),
        ResumeSource::Pdf(bytes) => {
            let extractor = state.extractor.clone();
            info!("Extracting text from {} byte upload", bytes.len());
            tokio::task::spawn_blocking(move || extractor.extract(&bytes))
                .await
                .unwrap_or_else(|e| {
                    warn!("Extraction task failed: {e}");
                    String::new()
                })
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::analysis::matcher::{MatchMode, ScoringPolicy};
    use crate::config::Config;
    use crate::extraction::PdfTextExtractor;
    use crate::persistence::AnalysisSink;

    /// Keeps records in memory so tests can inspect what was written.
    #[derive(Default)]
    pub struct RecordingSink {
        pub records: Mutex<Vec<AnalysisRecord>>,
        pub fail: bool,
    }

    #[async_trait]
    impl AnalysisSink for RecordingSink {
        async fn record(&self, record: &AnalysisRecord) -> Result<Option<Uuid>, AppError> {
            if self.fail {
                return Err(AppError::Internal(anyhow::anyhow!("store offline")));
            }
            self.records.lock().unwrap().push(record.clone());
            Ok(Some(record.id))
        }
    }

    pub fn test_config() -> Config {
        Config {
            database_url: None,
            anthropic_api_key: None,
            anthropic_api_url: crate::llm_client::DEFAULT_API_URL.to_string(),
            scoring_policy: ScoringPolicy::Gated,
            match_mode: MatchMode::WordBoundary,
            ocr_enabled: false,
            ocr_dpi: 300,
            ocr_lang: "eng".to_string(),
            max_upload_bytes: 1024 * 1024,
            llm_timeout_secs: 5,
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    pub fn test_state(sink: Arc<dyn AnalysisSink>) -> AppState {
        AppState {
            config: test_config(),
            extractor: Arc::new(PdfTextExtractor::new(None)),
            sink,
            http: reqwest::Client::new(),
        }
    }

    fn text_request(resume: &str, job: &str) -> AnalysisRequest {
        AnalysisRequest {
            resume: Some(ResumeSource::Text(resume.to_string())),
            job_description: job.to_string(),
            feedback: FeedbackMode::Template,
            api_key: None,
            save: true,
        }
    }

    #[tokio::test]
    async fn test_full_pipeline_from_text() {
        let sink = Arc::new(RecordingSink::default());
        let state = test_state(sink.clone());

        let response = run_analysis(
            &state,
            text_request("Python and Docker projects", "Requires Python, SQL, Docker"),
        )
        .await
        .unwrap();

        assert_eq!(response.result.score, 67);
        assert_eq!(response.result.missing_skills, vec!["sql"]);
        assert_eq!(response.timeline.len(), 1);
        assert_eq!(response.timeline[0].skill, "sql");
        assert!(!response.fully_ready);
        assert!(response.saved);
        assert!(response.notices.is_empty());
        assert_eq!(response.feedback.unwrap().strategy, "template");

        let records = sink.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].score, 67);
        assert_eq!(Some(records[0].id), response.analysis_id);
    }

    #[tokio::test]
    async fn test_blank_job_description_is_rejected() {
        let sink = Arc::new(RecordingSink::default());
        let state = test_state(sink.clone());

        let err = run_analysis(&state, text_request("python", "   "))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(sink.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_resume_is_rejected() {
        let state = test_state(Arc::new(RecordingSink::default()));
        let mut request = text_request("", "python");
        request.resume = None;
        let err = run_analysis(&state, request).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let mut request = text_request("", "python");
        request.resume = Some(ResumeSource::Pdf(Bytes::new()));
        let err = run_analysis(&state, request).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unreadable_pdf_reports_all_missing() {
        let state = test_state(Arc::new(RecordingSink::default()));
        let mut request = text_request("", "python, git");
        request.resume = Some(ResumeSource::Pdf(Bytes::from_static(b"not a pdf")));

        let response = run_analysis(&state, request).await.unwrap();
        assert_eq!(response.resume_chars, 0);
        assert_eq!(response.result.score, 0);
        assert_eq!(response.result.missing_skills, vec!["python", "git"]);
        assert_eq!(response.notices.len(), 1);
    }

    #[tokio::test]
    async fn test_sink_failure_becomes_notice() {
        let sink = Arc::new(RecordingSink {
            fail: true,
            ..Default::default()
        });
        let state = test_state(sink);

        let response = run_analysis(&state, text_request("python", "python"))
            .await
            .unwrap();
        assert!(!response.saved);
        assert!(response.analysis_id.is_none());
        assert_eq!(response.notices, vec!["An internal error occurred"]);
        assert_eq!(response.result.score, 100);
        assert!(response.fully_ready);
    }

    #[tokio::test]
    async fn test_save_false_skips_sink() {
        let sink = Arc::new(RecordingSink::default());
        let state = test_state(sink.clone());
        let mut request = text_request("python", "python");
        request.save = false;

        let response = run_analysis(&state, request).await.unwrap();
        assert!(!response.saved);
        assert!(sink.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_feedback_none_omits_block() {
        let state = test_state(Arc::new(RecordingSink::default()));
        let mut request = text_request("python", "python");
        request.feedback = FeedbackMode::None;

        let response = run_analysis(&state, request).await.unwrap();
        assert!(response.feedback.is_none());
    }

    #[tokio::test]
    async fn test_ai_feedback_without_key_is_unavailable_not_error() {
        let state = test_state(Arc::new(RecordingSink::default()));
        let mut request = text_request("python", "python, sql");
        request.feedback = FeedbackMode::Ai;
        request.api_key = Some("   ".to_string());

        let response = run_analysis(&state, request).await.unwrap();
        assert_eq!(response.feedback.unwrap().strategy, "unavailable");
        assert!(response.notices.is_empty());
    }

    #[tokio::test]
    async fn test_feedback_failure_becomes_notice() {
        // Bind then drop so the port refuses connections.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let mut state = test_state(Arc::new(RecordingSink::default()));
        state.config.anthropic_api_url = format!("http://127.0.0.1:{port}/v1/messages");

        let mut request = text_request("python and docker", "Requires Python, SQL, Docker");
        request.feedback = FeedbackMode::Ai;
        request.api_key = Some("sk-test".to_string());

        let response = run_analysis(&state, request).await.unwrap();
        assert!(response.feedback.is_none());
        assert_eq!(response.notices, vec!["AI feedback could not be generated"]);
        assert_eq!(response.result.score, 67);
        assert_eq!(response.timeline.len(), 1);
        assert_eq!(response.timeline[0].skill, "sql");
        assert!(response.saved);
    }
}
