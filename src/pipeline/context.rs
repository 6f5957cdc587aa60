//! What flows between stages besides findings: routing flags and the
//! notes appended to a task's input from earlier results.

use super::stage::StageId;
use super::state::{PipelineState, RoutingFlags};
use crate::core::{Severity, TaskLabel};

/// Critical findings quoted in the Testing input, at most.
const MAX_CRITICAL_AREAS: usize = 3;

/// Non-blank lines that are not `#` comments.
pub fn code_line_count(lines: &[String]) -> usize {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .count()
}

/// Flags decidable before any task runs.
pub(crate) fn initial_flags(flags: &mut RoutingFlags, code_lines: usize, min_lines: usize) {
    flags.skip_documentation = code_lines < min_lines;
    flags.needs_performance_review = true;
}

/// Flag updates applied when `stage` starts.
pub(crate) fn before_stage(stage: StageId, flags: &mut RoutingFlags) {
    if stage == StageId::ArchitectureTesting && flags.has_syntax_errors {
        flags.needs_performance_review = false;
    }
}

/// Flag updates derived from one task's result.
pub(crate) fn after_task(task: TaskLabel, has_critical: bool, flags: &mut RoutingFlags) {
    match task {
        TaskLabel::SyntaxLogic => flags.has_syntax_errors |= has_critical,
        TaskLabel::Security => flags.has_security_issues |= has_critical,
        _ => {}
    }
}

/// Input handed to `task`: the reviewed text plus any note derived from
/// earlier stages.
pub fn task_input(task: TaskLabel, state: &PipelineState) -> String {
    match context_note(task, state) {
        Some(note) => format!("{}{}", state.input_text(), note),
        None => state.input_text().to_string(),
    }
}

fn context_note(task: TaskLabel, state: &PipelineState) -> Option<String> {
    let flags = state.flags();
    match task {
        TaskLabel::Security if flags.has_syntax_errors => {
            let syntax_findings = state.findings_from(TaskLabel::SyntaxLogic).count();
            Some(format!(
                "\nNote: {syntax_findings} syntax/logic errors were found. Focus on security issues only.\n"
            ))
        }
        TaskLabel::Architecture if flags.has_security_issues => Some(
            "\nNote: Security vulnerabilities were found. Consider architectural changes that improve security.\n"
                .to_string(),
        ),
        TaskLabel::Testing => {
            let areas: Vec<String> = state
                .findings()
                .iter()
                .filter(|f| f.severity == Severity::Critical)
                .take(MAX_CRITICAL_AREAS)
                .map(|f| format!("Line {}: {}", f.line, f.issue))
                .collect();
            (!areas.is_empty()).then(|| {
                format!(
                    "\nCritical issues found at:\n{}\nPrioritize tests for these areas.\n",
                    areas.join("\n")
                )
            })
        }
        _ => None,
    }
}
