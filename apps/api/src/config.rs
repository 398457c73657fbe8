use std::str::FromStr;

use anyhow::{Context, Result};

use crate::analysis::matcher::{MatchMode, ScoringPolicy};
use crate::llm_client::DEFAULT_API_URL;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if a present variable cannot be parsed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Persistence is disabled when unset.
    pub database_url: Option<String>,
    /// Server-wide credential for delegated feedback. Requests may supply their own.
    pub anthropic_api_key: Option<String>,
    pub anthropic_api_url: String,
    pub scoring_policy: ScoringPolicy,
    pub match_mode: MatchMode,
    pub ocr_enabled: bool,
    pub ocr_dpi: u32,
    pub ocr_lang: String,
    pub max_upload_bytes: usize,
    pub llm_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            anthropic_api_url: optional_env("ANTHROPIC_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            scoring_policy: parse_env("SCORING_POLICY", ScoringPolicy::default())?,
            match_mode: parse_env("SKILL_MATCH_MODE", MatchMode::default())?,
            ocr_enabled: parse_env("OCR_ENABLED", true)?,
            ocr_dpi: parse_env("OCR_DPI", 300)?,
            ocr_lang: optional_env("OCR_LANG").unwrap_or_else(|| "eng".to_string()),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Returns the variable's value, treating blank values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional_env(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_port() {
        let port: u16 = parse_value("PORT", "9090").unwrap();
        assert_eq!(port, 9090);
    }

    #[test]
    fn test_parse_value_rejects_bad_port() {
        let err = parse_value::<u16>("PORT", "eighty").unwrap_err();
        assert!(format!("{err:#}").contains("PORT"));
    }

    #[test]
    fn test_parse_value_scoring_policy() {
        let policy: ScoringPolicy = parse_value("SCORING_POLICY", "derived").unwrap();
        assert_eq!(policy, ScoringPolicy::Derived);
    }

    #[test]
    fn test_parse_value_unknown_match_mode_mentions_key() {
        let err = parse_value::<MatchMode>("SKILL_MATCH_MODE", "fuzzy").unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("SKILL_MATCH_MODE"));
        assert!(msg.contains("fuzzy"));
    }

    #[test]
    fn test_parse_value_bool() {
        let enabled: bool = parse_value("OCR_ENABLED", "false").unwrap();
        assert!(!enabled);
    }
}
