use crate::core::Severity;
use crate::formatting::{Icon, OutputFormatter};
use crate::pipeline::PipelineState;
use std::fmt::Write;

const RULE_WIDTH: usize = 60;

/// Compact summary for the console: counts, per-task counts and digests.
pub fn render_summary(state: &PipelineState, fmt: &dyn OutputFormatter) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let counts = state.counts();
    let tone = state.tone();
    let mut out = String::new();

    writeln!(out, "{rule}").unwrap();
    writeln!(out, "{} {}", fmt.icon(Icon::Summary), fmt.header("REVIEW SUMMARY")).unwrap();
    writeln!(out, "{rule}").unwrap();

    writeln!(
        out,
        "\n{} Total Issues Found: {}",
        fmt.icon(Icon::Total),
        fmt.bold(&state.total_issues().to_string())
    )
    .unwrap();

    writeln!(out, "\n{} Issues by Type:", fmt.icon(Icon::ByTask)).unwrap();
    for (task, count) in state.by_source().iter().filter(|(_, c)| **c > 0) {
        writeln!(out, "   {} {}: {} issues", fmt.icon(Icon::Task(*task)), task, count).unwrap();
    }

    writeln!(out, "\n{} Severity Breakdown:", fmt.icon(Icon::Severity)).unwrap();
    let bullet = fmt.icon(Icon::Bullet);
    for (name, severity, value) in [
        ("Critical", Severity::Critical, counts.critical),
        ("Warnings", Severity::Warning, counts.warning),
        ("Suggestions", Severity::Suggestion, counts.suggestion),
    ] {
        writeln!(
            out,
            "   {bullet} {}: {} {}",
            name,
            fmt.severity(severity, &value.to_string()),
            fmt.icon(Icon::Level(severity))
        )
        .unwrap();
    }
    writeln!(
        out,
        "   {bullet} {}",
        fmt.dim(&format!(
            "Overall tone: critical {} | warning {} | suggestion {}",
            tone.critical, tone.warning, tone.suggestion
        ))
    )
    .unwrap();

    writeln!(out, "\n{} Key Findings:", fmt.icon(Icon::KeyFindings)).unwrap();
    for (task, digest) in state.summaries() {
        writeln!(out, "   {bullet} {task}: {digest}").unwrap();
    }

    writeln!(out, "\n{rule}").unwrap();
    writeln!(
        out,
        "{} {}",
        fmt.icon(Icon::Done),
        fmt.success("Review complete! Check the detailed report for full analysis.")
    )
    .unwrap();
    out.push_str(&rule);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TaskLabel;
    use crate::formatting::PlainFormatter;
    use crate::pipeline::TaskOutcome;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_summary_layout() {
        let mut state = PipelineState::new("x = 1", "a.py");
        state
            .merge(TaskOutcome::from_output(
                TaskLabel::Security,
                "Found 1 issue:\n1. SQL injection (Line 1): raw query",
            ))
            .unwrap();
        state
            .merge(TaskOutcome::from_output(
                TaskLabel::Performance,
                "No performance problems.",
            ))
            .unwrap();

        let summary = render_summary(&state, &PlainFormatter);

        let expected = indoc! {"
            ============================================================
            [SUMMARY] REVIEW SUMMARY
            ============================================================

            [TOTAL] Total Issues Found: 1

            [BY TASK] Issues by Type:
               - Security: 1 issues

            [SEVERITY] Severity Breakdown:
               - Critical: 1 [!]
               - Warnings: 0 [~]
               - Suggestions: 0 [.]
               - Overall tone: critical 1 | warning 1 | suggestion 0

            [KEY FINDINGS] Key Findings:
               - Security: Found 1 issue:
               - Performance: No performance problems.

            ============================================================
            [DONE] Review complete! Check the detailed report for full analysis.
            ============================================================"};
        assert_eq!(summary, expected);
    }
}
