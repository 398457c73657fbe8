//! Skill Matcher — classifies skills as matched or missing and computes the readiness score.
//!
//! Three scoring policies are supported and selected by name (`SCORING_POLICY`):
//!
//! - `gated` (default): vocabulary skills count only if the job description mentions
//!   them; score = matched / (matched + missing).
//! - `derived`: the job description itself is the skill list (comma/newline separated);
//!   score = matched / distinct job skills.
//! - `vocabulary`: same gating as `gated`, but score = matched / vocabulary size.
//!
//! Matching is case-insensitive. `MatchMode::WordBoundary` (default) requires the skill
//! not to be flanked by letters or digits; `MatchMode::Substring` is plain containment,
//! under which "sql" is found inside "mysql" and "java" inside "javascript".

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::vocabulary::{vocabulary_len, vocabulary_skills};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPolicy {
    #[default]
    Gated,
    Derived,
    #[serde(rename = "vocabulary", alias = "vocabulary_wide")]
    VocabularyWide,
}

impl ScoringPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringPolicy::Gated => "gated",
            ScoringPolicy::Derived => "derived",
            ScoringPolicy::VocabularyWide => "vocabulary",
        }
    }
}

impl fmt::Display for ScoringPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoringPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gated" => Ok(ScoringPolicy::Gated),
            "derived" => Ok(ScoringPolicy::Derived),
            "vocabulary" | "vocabulary_wide" => Ok(ScoringPolicy::VocabularyWide),
            other => Err(format!(
                "unknown scoring policy '{other}' (expected gated, derived or vocabulary)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    #[default]
    WordBoundary,
    Substring,
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "word_boundary" | "word" => Ok(MatchMode::WordBoundary),
            "substring" => Ok(MatchMode::Substring),
            other => Err(format!(
                "unknown match mode '{other}' (expected word_boundary or substring)"
            )),
        }
    }
}

/// Outcome of one analysis. Recomputed wholesale on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    /// 0 – 100
    pub score: u8,
    pub policy: ScoringPolicy,
}

/// Classifies skills and scores the resume against the job description.
/// Never fails: empty inputs produce empty lists and a score of 0.
pub fn analyze_skills(
    resume_text: &str,
    job_description: &str,
    policy: ScoringPolicy,
    mode: MatchMode,
) -> AnalysisResult {
    let resume = resume_text.to_lowercase();
    let job = job_description.to_lowercase();

    let relevant: Vec<String> = match policy {
        ScoringPolicy::Gated | ScoringPolicy::VocabularyWide => vocabulary_skills()
            .filter(|skill| contains_skill(&job, skill, mode))
            .map(String::from)
            .collect(),
        ScoringPolicy::Derived => derive_job_skills(&job),
    };

    let (matched_skills, missing_skills): (Vec<String>, Vec<String>) = relevant
        .into_iter()
        .partition(|skill| contains_skill(&resume, skill, mode));

    let denominator = match policy {
        ScoringPolicy::Gated | ScoringPolicy::Derived => {
            matched_skills.len() + missing_skills.len()
        }
        ScoringPolicy::VocabularyWide => vocabulary_len(),
    };

    let score = compute_score(matched_skills.len(), denominator);

    AnalysisResult {
        matched_skills,
        missing_skills,
        score,
        policy,
    }
}

/// Splits a job description on commas and newlines into a distinct, lowercase skill list.
pub fn derive_job_skills(job_description: &str) -> Vec<String> {
    let mut skills: Vec<String> = Vec::new();
    for part in job_description.split([',', '\n']) {
        let skill = part.trim().to_lowercase();
        if !skill.is_empty() && !skills.contains(&skill) {
            skills.push(skill);
        }
    }
    skills
}

/// Percentage rounded to the nearest integer. Only complete coverage reports 100.
pub fn compute_score(matched: usize, denominator: usize) -> u8 {
    if denominator == 0 {
        return 0;
    }
    if matched >= denominator {
        return 100;
    }
    let pct = ((matched as f64 / denominator as f64) * 100.0).round() as u8;
    pct.min(99)
}

/// Case-insensitive test for `skill` inside `text` under the given mode.
pub fn contains_skill(text: &str, skill: &str, mode: MatchMode) -> bool {
    let skill = skill.trim();
    if skill.is_empty() {
        return false;
    }
    match mode {
        MatchMode::Substring => text.to_lowercase().contains(&skill.to_lowercase()),
        MatchMode::WordBoundary => match vocabulary_pattern(skill) {
            Some(re) => re.is_match(text),
            None => match word_pattern(skill) {
                Ok(re) => re.is_match(text),
                Err(_) => text.to_lowercase().contains(&skill.to_lowercase()),
            },
        },
    }
}

/// Word-boundary patterns for the vocabulary, compiled once per process.
fn vocabulary_pattern(skill: &str) -> Option<&'static Regex> {
    static PATTERNS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            vocabulary_skills()
                .filter_map(|s| word_pattern(s).ok().map(|re| (s, re)))
                .collect()
        })
        .iter()
        .find(|(s, _)| s.eq_ignore_ascii_case(skill))
        .map(|(_, re)| re)
}

fn word_pattern(skill: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"(?i)(?:^|[^\p{{L}}\p{{N}}]){}(?:$|[^\p{{L}}\p{{N}}])",
        regex::escape(skill)
    ))
}
