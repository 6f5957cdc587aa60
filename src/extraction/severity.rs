//! Keyword-driven severity classification.
//!
//! Two rule tables live here. `TONE_RULES` grades a whole task output once;
//! `FINDING_RULES` grades a single finding line. Both are evaluated top to
//! bottom and the first table entry with a hit wins, so critical always
//! takes precedence over warning.

use crate::core::{Severity, SeverityCounts};

/// Ordered keyword table: the first entry with any hit decides.
pub type KeywordRules = [(Severity, &'static [&'static str])];

pub const TONE_RULES: &KeywordRules = &[
    (
        Severity::Critical,
        &[
            "critical",
            "severe",
            "vulnerability",
            "injection",
            "hardcoded",
            "plain text",
        ],
    ),
    (
        Severity::Warning,
        &["warning", "issue", "problem", "inefficient", "missing"],
    ),
    (
        Severity::Suggestion,
        &[
            "suggestion",
            "recommend",
            "consider",
            "improve",
            "enhancement",
        ],
    ),
];

pub const FINDING_RULES: &KeywordRules = &[
    (
        Severity::Critical,
        &["critical", "vulnerability", "injection", "leak"],
    ),
    (
        Severity::Warning,
        &["warning", "issue", "problem", "inefficient"],
    ),
];

/// First severity in `rules` whose keyword set hits `lowered`.
///
/// `lowered` must already be lower-cased.
pub fn first_match(lowered: &str, rules: &KeywordRules) -> Option<Severity> {
    rules
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|(severity, _)| *severity)
}

/// Overall tone of a task output, defaulting to suggestion.
pub fn tone(raw_text: &str) -> Severity {
    first_match(&raw_text.to_lowercase(), TONE_RULES).unwrap_or(Severity::Suggestion)
}

/// One-shot classification of a task output.
///
/// Exactly one counter is incremented per call. This is independent of the
/// per-finding severities produced by the extractor; both are tracked.
pub fn classify(raw_text: &str) -> SeverityCounts {
    let mut counts = SeverityCounts::default();
    counts.record(tone(raw_text));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_critical_stops_before_warning() {
        let counts = classify("Critical issue: hardcoded password and a missing check");
        assert_eq!(
            counts,
            SeverityCounts {
                critical: 1,
                warning: 0,
                suggestion: 0
            }
        );
    }

    #[test]
    fn test_warning_when_no_critical_keyword() {
        let counts = classify("One Problem with loop bounds");
        assert_eq!(counts.warning, 1);
        assert_eq!(counts.total(), 1);
    }

    #[test]
    fn test_suggestion_keyword() {
        let counts = classify("Consider extracting a helper");
        assert_eq!(counts.suggestion, 1);
        assert_eq!(counts.total(), 1);
    }

    #[test]
    fn test_default_is_suggestion() {
        let counts = classify("Looks fine overall.");
        assert_eq!(counts.suggestion, 1);
        assert_eq!(counts.total(), 1);
    }

    #[test]
    fn test_plain_text_phrase_is_critical() {
        assert_eq!(tone("Passwords stored in Plain Text"), Severity::Critical);
    }

    #[test]
    fn test_finding_rules_have_no_suggestion_entry() {
        assert_eq!(first_match("rename this variable", FINDING_RULES), None);
        assert_eq!(
            first_match("memory leak in loop", FINDING_RULES),
            Some(Severity::Critical)
        );
    }
}
