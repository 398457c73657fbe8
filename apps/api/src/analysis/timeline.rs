//! Timeline Builder — orders missing skills into a week-by-week learning plan.

use serde::{Deserialize, Serialize};

use crate::analysis::vocabulary::{rationale_for, LEARNING_ORDER};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// 1-based, dense
    pub week: u32,
    pub skill: String,
    /// Display name, e.g. "Rest Api".
    pub title: String,
    pub rationale: String,
}

/// Builds the learning plan for `missing`.
///
/// Skills in the canonical learning order come first, in that order; any other
/// missing skill follows in input order with the fallback rationale.
/// An empty input yields an empty plan.
pub fn build_timeline(missing: &[String]) -> Vec<TimelineEntry> {
    let ordered = LEARNING_ORDER
        .iter()
        .copied()
        .filter(|skill| missing.iter().any(|m| m == skill));

    let unordered = missing
        .iter()
        .map(String::as_str)
        .filter(|skill| !LEARNING_ORDER.contains(skill));

    let mut timeline: Vec<TimelineEntry> = Vec::with_capacity(missing.len());
    for skill in ordered.chain(unordered) {
        if timeline.iter().any(|e| e.skill == skill) {
            continue;
        }
        timeline.push(TimelineEntry {
            week: timeline.len() as u32 + 1,
            skill: skill.to_string(),
            title: title_case(skill),
            rationale: rationale_for(skill).to_string(),
        });
    }
    timeline
}

fn title_case(skill: &str) -> String {
    skill
        .split_whitespace()
        .map(|w| {
            let mut c = w.chars();
            match c.next() {
                None => String::new(),
                Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::vocabulary::FALLBACK_RATIONALE;

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_missing_yields_empty_timeline() {
        assert!(build_timeline(&[]).is_empty());
    }

    #[test]
    fn test_single_missing_sql() {
        let timeline = build_timeline(&skills(&["sql"]));
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].week, 1);
        assert_eq!(timeline[0].title, "Sql");
        assert_eq!(timeline[0].rationale, "Needed to manage and query databases");
    }

    #[test]
    fn test_follows_learning_order_not_input_order() {
        let timeline = build_timeline(&skills(&["docker", "sql", "python"]));
        let order: Vec<_> = timeline.iter().map(|e| e.skill.as_str()).collect();
        assert_eq!(order, vec!["python", "sql", "docker"]);
    }

    #[test]
    fn test_unknown_skills_appended_in_input_order() {
        let timeline = build_timeline(&skills(&["terraform", "git", "kafka"]));
        let order: Vec<_> = timeline.iter().map(|e| e.skill.as_str()).collect();
        assert_eq!(order, vec!["git", "terraform", "kafka"]);
        assert_eq!(timeline[1].rationale, FALLBACK_RATIONALE);
        assert_eq!(timeline[2].rationale, FALLBACK_RATIONALE);
    }

    #[test]
    fn test_weeks_are_dense_from_one() {
        let missing = skills(&["automation", "rest api", "java", "graphql", "algorithms"]);
        let timeline = build_timeline(&missing);
        assert_eq!(timeline.len(), missing.len());
        for (i, entry) in timeline.iter().enumerate() {
            assert_eq!(entry.week, i as u32 + 1);
        }
    }

    #[test]
    fn test_title_case_multi_word() {
        assert_eq!(title_case("machine learning"), "Machine Learning");
        assert_eq!(title_case("rest api"), "Rest Api");
    }
}
