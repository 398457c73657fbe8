//! Feedback Generator — narrative feedback behind one pluggable trait.
//!
//! `TemplatedFeedback` is deterministic and local. `DelegatedFeedback` sends one
//! prompt to the hosted model through `llm_client`. Which one runs is decided per
//! request by `FeedbackMode` and whether a credential is available.

use std::str::FromStr;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::prompts::{FEEDBACK_PROMPT_TEMPLATE, FEEDBACK_SYSTEM, RESUME_CHAR_BUDGET};
use crate::errors::AppError;
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, PLAIN_TEXT_INSTRUCTION};
use crate::llm_client::LlmClient;

pub const UNAVAILABLE_MESSAGE: &str = "AI feedback is unavailable: no API key was provided.";

/// Everything a feedback backend may draw on.
#[derive(Debug, Clone, Copy)]
pub struct FeedbackInput<'a> {
    pub resume_text: &'a str,
    pub job_description: &'a str,
    pub matched: &'a [String],
    pub missing: &'a [String],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackReport {
    pub text: String,
    /// "template" | "llm" | "unavailable"
    pub strategy: String,
}

#[async_trait]
pub trait FeedbackGenerator: Send + Sync {
    async fn generate(&self, input: &FeedbackInput<'_>) -> Result<FeedbackReport, AppError>;
}

/// Requested feedback behaviour for one analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackMode {
    /// Delegated when a credential is known, templated otherwise.
    #[default]
    Auto,
    Template,
    Ai,
    None,
}

impl FromStr for FeedbackMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "auto" => Ok(FeedbackMode::Auto),
            "template" => Ok(FeedbackMode::Template),
            "ai" | "llm" => Ok(FeedbackMode::Ai),
            "none" | "off" => Ok(FeedbackMode::None),
            other => Err(format!(
                "unknown feedback mode '{other}' (expected auto, template, ai or none)"
            )),
        }
    }
}

/// Picks the feedback backend for a request, or `None` when feedback is off.
pub fn select_feedback(
    mode: FeedbackMode,
    credential: Option<String>,
    http: &Client,
    api_url: &str,
) -> Option<Box<dyn FeedbackGenerator>> {
    match mode {
        FeedbackMode::None => None,
        FeedbackMode::Template => Some(Box::new(TemplatedFeedback)),
        FeedbackMode::Ai => Some(Box::new(DelegatedFeedback::new(
            http.clone(),
            api_url,
            credential,
        ))),
        FeedbackMode::Auto if credential.is_some() => Some(Box::new(DelegatedFeedback::new(
            http.clone(),
            api_url,
            credential,
        ))),
        FeedbackMode::Auto => Some(Box::new(TemplatedFeedback)),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// TemplatedFeedback
// ────────────────────────────────────────────────────────────────────────────

pub struct TemplatedFeedback;

#[async_trait]
impl FeedbackGenerator for TemplatedFeedback {
    async fn generate(&self, input: &FeedbackInput<'_>) -> Result<FeedbackReport, AppError> {
        Ok(FeedbackReport {
            text: templated_feedback(input.matched, input.missing),
            strategy: "template".to_string(),
        })
    }
}

fn templated_feedback(matched: &[String], missing: &[String]) -> String {
    let mut lines = vec!["Your resume shows good foundational skills.".to_string()];
    if !matched.is_empty() {
        lines.push(format!("Strengths detected: {}", matched.join(", ")));
    }
    if !missing.is_empty() {
        lines.push(format!("Skills to improve or learn: {}", missing.join(", ")));
    }
    lines.push(
        "Suggestion: Add relevant projects and achievements to strengthen your resume."
            .to_string(),
    );
    lines.push(
        "Tip: Focus on missing skills in the next few weeks based on difficulty and importance."
            .to_string(),
    );
    lines.join("\n")
}

// ────────────────────────────────────────────────────────────────────────────
// DelegatedFeedback
// ────────────────────────────────────────────────────────────────────────────

pub struct DelegatedFeedback {
    http: Client,
    api_url: String,
    api_key: Option<String>,
}

impl DelegatedFeedback {
    pub fn new(http: Client, api_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            api_url: api_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl FeedbackGenerator for DelegatedFeedback {
    async fn generate(&self, input: &FeedbackInput<'_>) -> Result<FeedbackReport, AppError> {
        let Some(api_key) = self.api_key.clone() else {
            return Ok(FeedbackReport {
                text: UNAVAILABLE_MESSAGE.to_string(),
                strategy: "unavailable".to_string(),
            });
        };

        let prompt = build_feedback_prompt(input);
        info!(
            "Requesting AI feedback ({} prompt chars, {} missing skills)",
            prompt.len(),
            input.missing.len()
        );

        let text = LlmClient::new(self.http.clone(), self.api_url.as_str(), api_key)
            .call_text(&prompt, FEEDBACK_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Feedback generation failed: {e}")))?;

        Ok(FeedbackReport {
            text,
            strategy: "llm".to_string(),
        })
    }
}

fn build_feedback_prompt(input: &FeedbackInput<'_>) -> String {
    let missing = if input.missing.is_empty() {
        "none".to_string()
    } else {
        input.missing.join(", ")
    };
    FEEDBACK_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{plain_text_instruction}", PLAIN_TEXT_INSTRUCTION)
        .replace("{resume_text}", &truncate_chars(input.resume_text, RESUME_CHAR_BUDGET))
        .replace("{job_description}", input.job_description)
        .replace("{missing_skills}", &missing)
}

fn truncate_chars(text: &str, budget: usize) -> String {
    text.chars().take(budget).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::DEFAULT_API_URL;

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_templated_lists_strengths_and_gaps() {
        let matched = skills(&["python", "docker"]);
        let missing = skills(&["sql"]);
        let input = FeedbackInput {
            resume_text: "python docker",
            job_description: "python sql docker",
            matched: &matched,
            missing: &missing,
        };
        let report = TemplatedFeedback.generate(&input).await.unwrap();
        assert_eq!(report.strategy, "template");
        assert!(report.text.contains("Strengths detected: python, docker"));
        assert!(report.text.contains("Skills to improve or learn: sql"));
        assert_eq!(report.text.lines().count(), 5);
    }

    #[test]
    fn test_templated_omits_empty_sections() {
        let text = templated_feedback(&[], &[]);
        assert!(!text.contains("Strengths detected"));
        assert!(!text.contains("Skills to improve"));
        assert_eq!(text.lines().count(), 3);
    }

    #[tokio::test]
    async fn test_delegated_without_key_is_unavailable() {
        let feedback = DelegatedFeedback::new(Client::new(), DEFAULT_API_URL, None);
        let input = FeedbackInput {
            resume_text: "",
            job_description: "python",
            matched: &[],
            missing: &[],
        };
        let report = feedback.generate(&input).await.unwrap();
        assert_eq!(report.text, UNAVAILABLE_MESSAGE);
        assert_eq!(report.strategy, "unavailable");
    }

    #[test]
    fn test_prompt_truncates_resume() {
        let resume = "a".repeat(RESUME_CHAR_BUDGET + 500);
        let missing = skills(&["sql", "git"]);
        let input = FeedbackInput {
            resume_text: &resume,
            job_description: "Backend role needing SQL and Git",
            matched: &[],
            missing: &missing,
        };
        let prompt = build_feedback_prompt(&input);
        assert!(prompt.contains(&"a".repeat(RESUME_CHAR_BUDGET)));
        assert!(!prompt.contains(&"a".repeat(RESUME_CHAR_BUDGET + 1)));
        assert!(prompt.contains("Backend role needing SQL and Git"));
        assert!(prompt.contains("sql, git"));
    }

    #[test]
    fn test_truncate_chars_respects_multibyte() {
        assert_eq!(truncate_chars("résumé", 3), "rés");
    }

    #[test]
    fn test_feedback_mode_from_str() {
        assert_eq!("".parse::<FeedbackMode>(), Ok(FeedbackMode::Auto));
        assert_eq!("LLM".parse::<FeedbackMode>(), Ok(FeedbackMode::Ai));
        assert_eq!("none".parse::<FeedbackMode>(), Ok(FeedbackMode::None));
        assert!("verbose".parse::<FeedbackMode>().is_err());
    }

    #[tokio::test]
    async fn test_select_auto_without_credential_uses_template() {
        let generator =
            select_feedback(FeedbackMode::Auto, None, &Client::new(), DEFAULT_API_URL).unwrap();
        let input = FeedbackInput {
            resume_text: "",
            job_description: "",
            matched: &[],
            missing: &[],
        };
        let report = generator.generate(&input).await.unwrap();
        assert_eq!(report.strategy, "template");
    }

    #[tokio::test]
    async fn test_select_ai_without_credential_reports_unavailable() {
        let generator =
            select_feedback(FeedbackMode::Ai, None, &Client::new(), DEFAULT_API_URL).unwrap();
        let input = FeedbackInput {
            resume_text: "",
            job_description: "",
            matched: &[],
            missing: &[],
        };
        let report = generator.generate(&input).await.unwrap();
        assert_eq!(report.strategy, "unavailable");
    }

    #[test]
    fn test_select_none_disables_feedback() {
        let generator = select_feedback(
            FeedbackMode::None,
            Some("key".into()),
            &Client::new(),
            DEFAULT_API_URL,
        );
        assert!(generator.is_none());
    }
}
