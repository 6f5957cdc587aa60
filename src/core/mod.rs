//! Core data model shared by the extractor, the pipeline and the reports.

use serde::{Deserialize, Serialize};

/// Identifies one of the fixed analysis tasks.
///
/// Variants are declared in pipeline order, so the derived `Ord` sorts
/// labels the way the review graph visits them.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[serde(rename_all = "snake_case")]
pub enum TaskLabel {
    SyntaxLogic,
    Security,
    Performance,
    Architecture,
    Testing,
    Documentation,
}

impl TaskLabel {
    pub const ALL: [TaskLabel; 6] = [
        TaskLabel::SyntaxLogic,
        TaskLabel::Security,
        TaskLabel::Performance,
        TaskLabel::Architecture,
        TaskLabel::Testing,
        TaskLabel::Documentation,
    ];

    /// Human-readable label used in digests and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SyntaxLogic => "Syntax & Logic",
            Self::Security => "Security",
            Self::Performance => "Performance",
            Self::Architecture => "Architecture",
            Self::Testing => "Testing",
            Self::Documentation => "Documentation",
        }
    }

    /// Key used for this task in the `[tasks]` configuration table.
    pub fn config_key(&self) -> &'static str {
        match self {
            Self::SyntaxLogic => "syntax_logic",
            Self::Security => "security",
            Self::Performance => "performance",
            Self::Architecture => "architecture",
            Self::Testing => "testing",
            Self::Documentation => "documentation",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|task| task.label() == label || task.config_key() == label)
    }
}

impl std::fmt::Display for TaskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Suggestion,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        static DISPLAY_STRINGS: &[(Severity, &str)] = &[
            (Severity::Critical, "critical"),
            (Severity::Warning, "warning"),
            (Severity::Suggestion, "suggestion"),
        ];

        let display_str = DISPLAY_STRINGS
            .iter()
            .find(|(s, _)| s == self)
            .map(|(_, s)| *s)
            .unwrap_or("unknown");

        write!(f, "{display_str}")
    }
}

/// A normalized record extracted from one task's raw output.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Finding {
    pub source: TaskLabel,
    /// Line in the reviewed input, `0` when the output gave none.
    pub line: usize,
    pub issue: String,
    pub severity: Severity,
    /// Remediation line as written by the task, empty when absent.
    pub fix: String,
}

impl Finding {
    pub fn new(source: TaskLabel, line: usize, issue: impl Into<String>, severity: Severity) -> Self {
        Self {
            source,
            line,
            issue: issue.into(),
            severity,
            fix: String::new(),
        }
    }

    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.fix = fix.into();
        self
    }

    pub fn has_fix(&self) -> bool {
        !self.fix.is_empty()
    }
}

/// Per-severity tally.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeverityCounts {
    pub critical: usize,
    pub warning: usize,
    pub suggestion: usize,
}

impl SeverityCounts {
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::Warning => self.warning += 1,
            Severity::Suggestion => self.suggestion += 1,
        }
    }

    pub fn from_findings<'a>(findings: impl IntoIterator<Item = &'a Finding>) -> Self {
        findings
            .into_iter()
            .fold(Self::default(), |mut counts, finding| {
                counts.record(finding.severity);
                counts
            })
    }

    pub fn total(&self) -> usize {
        self.critical + self.warning + self.suggestion
    }

    pub fn add(&mut self, other: &SeverityCounts) {
        self.critical += other.critical;
        self.warning += other.warning;
        self.suggestion += other.suggestion;
    }
}
