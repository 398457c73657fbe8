//! The hardcoded skill vocabulary and the foundational-to-advanced learning order.

use serde::Serialize;

/// Skills recognised by the fixed-vocabulary policies, in reporting order.
/// Each skill carries the rationale shown in the learning timeline.
pub const SKILL_VOCABULARY: &[(&str, &str)] = &[
    ("python", "Foundation for most development and automation roles"),
    ("java", "Builds strong object-oriented programming concepts"),
    ("sql", "Needed to manage and query databases"),
    ("data structures", "Required to write optimized and efficient code"),
    ("algorithms", "Essential for technical interviews and problem solving"),
    ("git", "Industry standard for version control"),
    ("docker", "Helps deploy applications consistently"),
    ("rest api", "Used to connect frontend and backend systems"),
    ("selenium", "Core skill for QA automation"),
    ("machine learning", "Advanced skill for intelligent systems"),
    ("cloud computing", "Used for scalable and real-world deployments"),
    ("testing", "Builds software reliability knowledge"),
    ("automation", "Improves efficiency and reduces manual work"),
];

/// Learning order: language foundations, problem solving, data, integration
/// and tooling, then specialised skills.
pub const LEARNING_ORDER: &[&str] = &[
    "python",
    "java",
    "data structures",
    "algorithms",
    "sql",
    "rest api",
    "git",
    "docker",
    "selenium",
    "machine learning",
    "cloud computing",
    "testing",
    "automation",
];

pub const FALLBACK_RATIONALE: &str = "Important skill for this role";

pub fn vocabulary_skills() -> impl Iterator<Item = &'static str> {
    SKILL_VOCABULARY.iter().map(|(skill, _)| *skill)
}

pub fn vocabulary_len() -> usize {
    SKILL_VOCABULARY.len()
}

/// Rationale for a skill, or the generic fallback for skills outside the vocabulary.
pub fn rationale_for(skill: &str) -> &'static str {
    SKILL_VOCABULARY
        .iter()
        .find(|(s, _)| *s == skill)
        .map(|(_, rationale)| *rationale)
        .unwrap_or(FALLBACK_RATIONALE)
}

#[derive(Debug, Clone, Serialize)]
pub struct VocabularyEntry {
    pub skill: &'static str,
    pub rationale: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct VocabularyListing {
    pub skills: Vec<VocabularyEntry>,
    pub learning_order: Vec<&'static str>,
}

pub fn vocabulary_listing() -> VocabularyListing {
    VocabularyListing {
        skills: SKILL_VOCABULARY
            .iter()
            .map(|(skill, rationale)| VocabularyEntry { skill, rationale })
            .collect(),
        learning_order: LEARNING_ORDER.to_vec(),
    }
}
