//! The aggregate threaded through one pipeline run.

use super::stage::{TaskOutcome, TaskStatus};
use crate::core::{Finding, SeverityCounts, TaskLabel};
use crate::errors::{PipelineError, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// Booleans computed by earlier stages and read by later ones.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
pub struct RoutingFlags {
    /// Syntax & Logic produced at least one critical finding
    pub has_syntax_errors: bool,
    /// Security produced at least one critical finding
    pub has_security_issues: bool,
    pub needs_performance_review: bool,
    /// The input is too small for documentation analysis
    pub skip_documentation: bool,
}

/// Pipeline State for a single review.
///
/// Created empty by [`PipelineState::new`], filled stage by stage and frozen
/// by [`PipelineState::finalize`]. Every mutation after that returns
/// [`PipelineError::Finalized`].
#[derive(Clone, Debug, Serialize)]
pub struct PipelineState {
    filename: String,
    timestamp: Option<String>,
    input_text: String,
    input_lines: Vec<String>,
    findings: Vec<Finding>,
    summaries: BTreeMap<TaskLabel, String>,
    counts: SeverityCounts,
    tone: SeverityCounts,
    by_source: BTreeMap<TaskLabel, usize>,
    flags: RoutingFlags,
    report_text: Option<String>,
    summary_text: Option<String>,
    #[serde(skip)]
    initialized: bool,
    #[serde(skip)]
    finalized: bool,
}

impl PipelineState {
    pub fn new(input_text: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            timestamp: None,
            input_text: input_text.into(),
            input_lines: Vec::new(),
            findings: Vec::new(),
            summaries: BTreeMap::new(),
            counts: SeverityCounts::default(),
            tone: SeverityCounts::default(),
            by_source: BTreeMap::new(),
            flags: RoutingFlags::default(),
            report_text: None,
            summary_text: None,
            initialized: false,
            finalized: false,
        }
    }

    /// Attach a caller-provided timestamp shown in the rendered report.
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn input_lines(&self) -> &[String] {
        &self.input_lines
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn summaries(&self) -> &BTreeMap<TaskLabel, String> {
        &self.summaries
    }

    /// Per-finding severity totals.
    pub fn counts(&self) -> SeverityCounts {
        self.counts
    }

    pub fn total_issues(&self) -> usize {
        self.counts.total()
    }

    /// One-shot tone classification summed over every successful task.
    pub fn tone(&self) -> SeverityCounts {
        self.tone
    }

    pub fn by_source(&self) -> &BTreeMap<TaskLabel, usize> {
        &self.by_source
    }

    pub fn flags(&self) -> RoutingFlags {
        self.flags
    }

    pub fn report_text(&self) -> Option<&str> {
        self.report_text.as_deref()
    }

    pub fn summary_text(&self) -> Option<&str> {
        self.summary_text.as_deref()
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Findings from `source`, in merge order.
    pub fn findings_from(&self, source: TaskLabel) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.source == source)
    }

    /// Sources in order of their first finding.
    pub fn sources_in_order(&self) -> Vec<TaskLabel> {
        let mut seen = Vec::new();
        for finding in &self.findings {
            if !seen.contains(&finding.source) {
                seen.push(finding.source);
            }
        }
        seen
    }

    /// Split the input into lines. Only the first call has any effect.
    pub(crate) fn initialize(&mut self) -> Result<()> {
        self.ensure_mutable()?;
        if !self.initialized {
            self.input_lines = self.input_text.lines().map(str::to_string).collect();
            self.initialized = true;
        }
        Ok(())
    }

    pub(crate) fn update_flags(&mut self, update: impl FnOnce(&mut RoutingFlags)) -> Result<()> {
        self.ensure_mutable()?;
        update(&mut self.flags);
        Ok(())
    }

    /// Fold one task outcome into the aggregate.
    ///
    /// Disabled tasks leave no trace. Failed tasks record a zero count and
    /// their failure digest.
    pub(crate) fn merge(&mut self, outcome: TaskOutcome) -> Result<()> {
        self.ensure_mutable()?;
        let TaskOutcome {
            task,
            status,
            findings,
            digest,
            tone,
        } = outcome;

        if status == TaskStatus::Disabled {
            return Ok(());
        }

        self.by_source.insert(task, findings.len());
        if let Some(digest) = digest {
            self.summaries.insert(task, digest);
        }
        self.tone.add(&tone);
        self.findings.extend(findings);
        self.counts = SeverityCounts::from_findings(&self.findings);
        Ok(())
    }

    pub(crate) fn finalize(&mut self, summary_text: String, report_text: String) -> Result<()> {
        self.ensure_mutable()?;
        self.summary_text = Some(summary_text);
        self.report_text = Some(report_text);
        self.finalized = true;
        Ok(())
    }

    fn ensure_mutable(&self) -> Result<()> {
        if self.finalized {
            Err(PipelineError::Finalized)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Severity;
    use crate::errors::TaskError;

    fn outcome(task: TaskLabel, raw: &str) -> TaskOutcome {
        TaskOutcome::from_output(task, raw)
    }

    #[test]
    fn test_new_state_is_empty() {
        let state = PipelineState::new("x = 1\n", "a.py");
        assert_eq!(state.total_issues(), 0);
        assert!(state.findings().is_empty());
        assert!(state.summaries().is_empty());
        assert!(state.report_text().is_none());
        assert!(state.summary_text().is_none());
        assert!(!state.is_finalized());
    }

    #[test]
    fn test_initialize_splits_lines_once() {
        let mut state = PipelineState::new("a\nb\n\nc", "a.py");
        state.initialize().unwrap();
        state.initialize().unwrap();
        assert_eq!(state.input_lines(), &["a", "b", "", "c"]);
    }

    #[test]
    fn test_merge_recomputes_counters() {
        let mut state = PipelineState::new("", "a.py");
        state
            .merge(outcome(
                TaskLabel::Security,
                "1. SQL injection (Line 2): bad\n2. Missing rate limit issue",
            ))
            .unwrap();
        state
            .merge(outcome(TaskLabel::Testing, "- Add tests for edge cases"))
            .unwrap();

        let counts = state.counts();
        assert_eq!(counts.critical, 1);
        assert_eq!(counts.warning, 1);
        assert_eq!(counts.suggestion, 1);
        assert_eq!(state.total_issues(), 3);
        assert_eq!(state.by_source()[&TaskLabel::Security], 2);
        assert_eq!(state.by_source()[&TaskLabel::Testing], 1);
        assert_eq!(state.tone().total(), 2);
    }

    #[test]
    fn test_failed_outcome_records_marker_and_zero() {
        let mut state = PipelineState::new("", "a.py");
        state
            .merge(TaskOutcome::failed(
                TaskLabel::Performance,
                TaskError::transport("timed out"),
            ))
            .unwrap();

        assert_eq!(state.by_source()[&TaskLabel::Performance], 0);
        assert!(state.summaries()[&TaskLabel::Performance].starts_with("Analysis failed"));
        assert_eq!(state.tone().total(), 0);
    }

    #[test]
    fn test_disabled_outcome_leaves_no_trace() {
        let mut state = PipelineState::new("", "a.py");
        state
            .merge(TaskOutcome::disabled(TaskLabel::Documentation))
            .unwrap();
        assert!(state.by_source().is_empty());
        assert!(state.summaries().is_empty());
    }

    #[test]
    fn test_finalized_state_rejects_mutation() {
        let mut state = PipelineState::new("", "a.py");
        state.finalize("summary".into(), "report".into()).unwrap();

        assert_eq!(
            state.merge(outcome(TaskLabel::Security, "- leak")),
            Err(PipelineError::Finalized)
        );
        assert_eq!(
            state.update_flags(|f| f.skip_documentation = true),
            Err(PipelineError::Finalized)
        );
        assert_eq!(state.summary_text(), Some("summary"));
        assert!(!state.flags().skip_documentation);
    }

    #[test]
    fn test_sources_in_first_occurrence_order() {
        let mut state = PipelineState::new("", "a.py");
        state
            .merge(outcome(TaskLabel::Testing, "- add a test"))
            .unwrap();
        state
            .merge(outcome(TaskLabel::Security, "- critical leak"))
            .unwrap();
        state
            .merge(outcome(TaskLabel::Testing, "- another test"))
            .unwrap();

        assert_eq!(
            state.sources_in_order(),
            vec![TaskLabel::Testing, TaskLabel::Security]
        );
        assert_eq!(state.findings_from(TaskLabel::Testing).count(), 2);
        assert_eq!(
            state
                .findings_from(TaskLabel::Security)
                .next()
                .map(|f| f.severity),
            Some(Severity::Critical)
        );
    }
}
