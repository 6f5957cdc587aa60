use crate::core::Finding;
use crate::pipeline::PipelineState;

const WIDE: usize = 80;
const NARROW: usize = 40;

/// Long-form plain-text report with every finding grouped by task.
///
/// Tasks appear in the order of their first finding. The only time-related
/// content is the caller-supplied timestamp.
pub fn render_report(state: &PipelineState) -> String {
    let wide = "=".repeat(WIDE);
    let counts = state.counts();
    let mut lines: Vec<String> = Vec::new();

    lines.push(wide.clone());
    lines.push(format!("CODE REVIEW REPORT - {}", state.filename()));
    lines.push(wide.clone());
    if let Some(timestamp) = state.timestamp() {
        lines.push(format!("Date: {timestamp}"));
    }
    lines.push(format!("Lines: {}", state.input_lines().len()));
    lines.push(wide.clone());

    if state.total_issues() == 0 {
        lines.push("\nSUMMARY: No issues found".to_string());
    } else {
        lines.push(format!("\nSUMMARY: {} issues found", state.total_issues()));
    }
    lines.push("-".repeat(NARROW));

    let per_task: Vec<String> = state
        .by_source()
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(task, count)| format!("{task}: {count}"))
        .collect();
    if !per_task.is_empty() {
        lines.push(per_task.join(" | "));
    }

    let per_severity: Vec<String> = [
        ("Critical", counts.critical),
        ("Warnings", counts.warning),
        ("Suggestions", counts.suggestion),
    ]
    .into_iter()
    .filter(|(_, n)| *n > 0)
    .map(|(name, n)| format!("{name}: {n}"))
    .collect();
    if !per_severity.is_empty() {
        lines.push(per_severity.join(" | "));
    }

    let tone = state.tone();
    lines.push(format!(
        "Overall tone: critical {} | warning {} | suggestion {}",
        tone.critical, tone.warning, tone.suggestion
    ));

    if !state.summaries().is_empty() {
        lines.push("\nKEY FINDINGS:".to_string());
        for (task, digest) in state.summaries() {
            lines.push(format!("  {task}: {digest}"));
        }
    }

    let sources = state.sources_in_order();
    if !sources.is_empty() {
        lines.push(format!("\n{wide}"));
        lines.push("\nDETAILED FINDINGS:".to_string());
        lines.push(wide.clone());

        for source in sources {
            lines.push(format!("\n[{}]", source.label().to_uppercase()));
            lines.push("-".repeat(WIDE));
            for (i, finding) in state.findings_from(source).enumerate() {
                lines.push(format!("{}. {}", i + 1, finding_text(finding)));
                if finding.has_fix() {
                    lines.push(format!("   {}", finding.fix));
                }
                lines.push(String::new());
            }
        }
    }

    lines.push(wide.clone());
    lines.push("END OF REPORT".to_string());
    lines.push(wide);
    lines.join("\n")
}

/// `Line N: issue` when the line is known, the bare issue otherwise.
pub fn finding_text(finding: &Finding) -> String {
    if finding.line > 0 {
        format!("Line {}: {}", finding.line, finding.issue)
    } else {
        finding.issue.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TaskLabel;
    use crate::pipeline::TaskOutcome;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_report_groups_by_first_occurrence() {
        let mut state = PipelineState::new("a\nb", "app.py").with_timestamp("2024-05-01 10:00:00");
        state.initialize().unwrap();
        state
            .merge(TaskOutcome::from_output(
                TaskLabel::Testing,
                "- Add a test for empty input",
            ))
            .unwrap();
        state
            .merge(TaskOutcome::from_output(
                TaskLabel::Security,
                "1. SQL injection (Line 2): raw query\n- Fix: use parameters",
            ))
            .unwrap();

        let report = render_report(&state);

        let expected = indoc! {"
            ================================================================================
            CODE REVIEW REPORT - app.py
            ================================================================================
            Date: 2024-05-01 10:00:00
            Lines: 2
            ================================================================================

            SUMMARY: 2 issues found
            ----------------------------------------
            Security: 1 | Testing: 1
            Critical: 1 | Suggestions: 1
            Overall tone: critical 1 | warning 0 | suggestion 1

            KEY FINDINGS:
              Security: SQL injection (Line 2): raw query
              Testing: - Add a test for empty input

            ================================================================================

            DETAILED FINDINGS:
            ================================================================================

            [TESTING]
            --------------------------------------------------------------------------------
            1. Add a test for empty input


            [SECURITY]
            --------------------------------------------------------------------------------
            1. Line 2: SQL injection (Line 2): raw query
               - Fix: use parameters

            ================================================================================
            END OF REPORT
            ================================================================================"};
        assert_eq!(report, expected);
    }

    #[test]
    fn test_empty_state_report() {
        let state = PipelineState::new("", "empty.py");
        let report = render_report(&state);
        assert!(report.contains("SUMMARY: No issues found"));
        assert!(!report.contains("Date:"));
        assert!(!report.contains("DETAILED FINDINGS"));
        assert!(report.ends_with(&format!("END OF REPORT\n{}", "=".repeat(WIDE))));
    }
}
