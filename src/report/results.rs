//! Serializable results documents written next to the text report.

use super::detailed::finding_text;
use crate::core::{SeverityCounts, TaskLabel};
use crate::pipeline::PipelineState;
use crate::tasks::prompts;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Review of one input, as written to `ReviewResults.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewResults {
    pub filename: String,
    pub timestamp: Option<String>,
    /// Number of input lines
    pub code_length: usize,
    pub reviews: Vec<TaskReview>,
    pub numbered_code: String,
    pub summary: ResultsSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskReview {
    pub task: TaskLabel,
    pub role: String,
    pub key_finding: String,
    /// Findings rebuilt as a numbered list
    pub feedback: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultsSummary {
    pub total_issues: usize,
    pub critical_issues: usize,
    pub warnings: usize,
    pub suggestions: usize,
    pub by_task: BTreeMap<TaskLabel, usize>,
    pub tone: SeverityCounts,
}

impl ReviewResults {
    pub fn from_state(state: &PipelineState) -> Self {
        let reviews = state
            .summaries()
            .iter()
            .map(|(task, digest)| TaskReview {
                task: *task,
                role: prompts::role(*task).to_string(),
                key_finding: digest.clone(),
                feedback: feedback_for(state, *task),
            })
            .collect();

        let counts = state.counts();
        Self {
            filename: state.filename().to_string(),
            timestamp: state.timestamp().map(str::to_string),
            code_length: state.input_lines().len(),
            reviews,
            numbered_code: numbered_listing(state.input_lines()),
            summary: ResultsSummary {
                total_issues: state.total_issues(),
                critical_issues: counts.critical,
                warnings: counts.warning,
                suggestions: counts.suggestion,
                by_task: state.by_source().clone(),
                tone: state.tone(),
            },
        }
    }
}

fn feedback_for(state: &PipelineState, task: TaskLabel) -> String {
    let findings: Vec<_> = state.findings_from(task).collect();
    if findings.is_empty() {
        return "No issues found.".to_string();
    }

    let mut lines = vec![format!("Found {} issues:\n", findings.len())];
    for (i, finding) in findings.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, finding_text(finding)));
        if finding.has_fix() {
            lines.push(format!("   {}", finding.fix));
        }
    }
    lines.join("\n")
}

/// Input lines prefixed with right-aligned line numbers.
pub fn numbered_listing(lines: &[String]) -> String {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:4} | {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Outcome of one file in a batch run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum BatchEntry {
    Reviewed(ReviewResults),
    Failed { filename: String, error: String },
}

impl BatchEntry {
    pub fn filename(&self) -> &str {
        match self {
            Self::Reviewed(results) => &results.filename,
            Self::Failed { filename, .. } => filename,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Document written as `BatchReview_<timestamp>.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchReport {
    pub date: String,
    pub directory: String,
    pub files_reviewed: usize,
    pub results: Vec<BatchEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::TaskOutcome;

    fn reviewed_state() -> PipelineState {
        let mut state = PipelineState::new("import os\nx = 1", "app.py").with_timestamp("t0");
        state.initialize().unwrap();
        state
            .merge(TaskOutcome::from_output(
                TaskLabel::Security,
                "1. Hardcoded key leak (Line 2): secret in source\nFix: read it from the environment",
            ))
            .unwrap();
        state
            .merge(TaskOutcome::from_output(
                TaskLabel::Testing,
                "Basic testing adequate for this code.",
            ))
            .unwrap();
        state
    }

    #[test]
    fn test_results_rebuild_feedback_from_findings() {
        let results = ReviewResults::from_state(&reviewed_state());

        assert_eq!(results.code_length, 2);
        assert_eq!(results.reviews.len(), 2);
        assert_eq!(
            results.reviews[0].feedback,
            "Found 1 issues:\n\n1. Line 2: Hardcoded key leak (Line 2): secret in source\n   Fix: read it from the environment"
        );
        assert_eq!(results.reviews[1].feedback, "No issues found.");
        assert_eq!(results.summary.critical_issues, 1);
        assert_eq!(results.summary.by_task[&TaskLabel::Testing], 0);
    }

    #[test]
    fn test_numbered_listing_alignment() {
        let lines = vec!["a".to_string(), "b".to_string()];
        assert_eq!(numbered_listing(&lines), "   1 | a\n   2 | b");
    }

    #[test]
    fn test_results_json_uses_snake_case_labels() {
        let results = ReviewResults::from_state(&reviewed_state());
        let json = serde_json::to_value(&results).unwrap();

        assert_eq!(json["reviews"][0]["task"], "security");
        assert_eq!(json["summary"]["by_task"]["security"], 1);
        assert_eq!(json["timestamp"], "t0");
    }

    #[test]
    fn test_batch_entry_failure_serializes_flat() {
        let entry = BatchEntry::Failed {
            filename: "bad.py".into(),
            error: "stream did not contain valid UTF-8".into(),
        };
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["filename"], "bad.py");
        assert!(entry.is_failure());
        assert_eq!(entry.filename(), "bad.py");
    }
}
