//! Property-based tests for extraction and merge invariants
//!
//! - Extraction is deterministic and re-extracting rendered findings is a
//!   fixed point, whether re-rendered as a numbered or a bulleted list
//! - Severity counts always add up to the number of findings
//! - Parallel stages merge in the same order whatever the task latency

mod common;

use common::{numbered_output, ScriptedInvoker, LONG_INPUT};
use proptest::prelude::*;
use review_council::extraction::findings::parse_line_reference;
use review_council::extraction::{classify, extract};
use review_council::{Orchestrator, ReviewConfig, SeverityCounts, TaskLabel};

fn task_label() -> impl Strategy<Value = TaskLabel> {
    prop::sample::select(TaskLabel::ALL.to_vec())
}

/// Lowercase prose; never contains the capitalized `Line` token.
fn issue_text() -> impl Strategy<Value = String> {
    "[a-z]{1,8}( [a-z]{1,8}){0,5}"
}

fn list_item() -> impl Strategy<Value = (usize, String, Option<String>)> {
    (
        1usize..500,
        issue_text(),
        prop::option::of(issue_text()),
    )
}

fn render(items: &[(usize, String, Option<String>)]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, (line, issue, fix))| match fix {
            Some(fix) => format!("{}. Line {}: {}\n   Fix: {}", i + 1, line, issue, fix),
            None => format!("{}. Line {}: {}", i + 1, line, issue),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

proptest! {
    #[test]
    fn prop_extract_is_deterministic(text in "(?s).{0,400}", task in task_label()) {
        prop_assert_eq!(extract(&text, task), extract(&text, task));
        prop_assert_eq!(classify(&text), classify(&text));
    }

    #[test]
    fn prop_every_list_item_becomes_one_finding(
        items in prop::collection::vec(list_item(), 1..12),
        task in task_label(),
    ) {
        let findings = extract(&render(&items), task);

        prop_assert_eq!(findings.len(), items.len());
        for (finding, (line, _, fix)) in findings.iter().zip(&items) {
            prop_assert_eq!(finding.source, task);
            prop_assert_eq!(finding.line, *line);
            prop_assert_eq!(finding.has_fix(), fix.is_some());
        }
    }

    #[test]
    fn prop_reextracting_rendered_findings_is_a_fixed_point(
        items in prop::collection::vec(list_item(), 1..12),
        task in task_label(),
    ) {
        let first = extract(&render(&items), task);
        let rerendered = first
            .iter()
            .enumerate()
            .map(|(i, f)| {
                if f.has_fix() {
                    format!("{}. {}\n{}", i + 1, f.issue, f.fix)
                } else {
                    format!("{}. {}", i + 1, f.issue)
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        prop_assert_eq!(extract(&rerendered, task), first);
    }

    #[test]
    fn prop_bullet_rerender_keeps_issue_and_line(
        items in prop::collection::vec(list_item(), 1..12),
        bullet in prop::sample::select(vec!['-', '•', '*', '►']),
        task in task_label(),
    ) {
        let first = extract(&render(&items), task);
        let rerendered = first
            .iter()
            .map(|f| {
                if f.has_fix() {
                    format!("{bullet} {}\n{}", f.issue, f.fix)
                } else {
                    format!("{bullet} {}", f.issue)
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        prop_assert_eq!(extract(&rerendered, task), first);
    }

    #[test]
    fn prop_severity_counts_sum_to_findings(text in "(?s).{0,400}", task in task_label()) {
        let findings = extract(&text, task);
        prop_assert_eq!(SeverityCounts::from_findings(&findings).total(), findings.len());
        prop_assert_eq!(classify(&text).total(), 1);
    }

    #[test]
    fn prop_line_reference_never_panics(text in "(?s).{0,120}") {
        let _ = parse_line_reference(&text);
    }

    #[test]
    fn prop_line_reference_reads_the_number(n in 0usize..100_000, rest in issue_text()) {
        prop_assert_eq!(parse_line_reference(&format!("1. Line {n}: {rest}")), n);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn prop_parallel_merge_ignores_latency(delays in prop::collection::vec(0u64..15, 4)) {
        let scripted = || {
            ScriptedInvoker::quiet()
                .output(TaskLabel::Security, &numbered_output(&[(2, "Token leak in log")]))
                .output(TaskLabel::Performance, &numbered_output(&[(5, "Inefficient join")]))
                .output(TaskLabel::Architecture, &numbered_output(&[(7, "God module")]))
                .output(TaskLabel::Testing, &numbered_output(&[(9, "Missing edge tests")]))
        };
        let orchestrator = Orchestrator::new(ReviewConfig::default()).unwrap();
        let baseline = orchestrator.run(LONG_INPUT, "load.py", &scripted()).unwrap();

        let jittered = scripted()
            .delay(TaskLabel::Security, delays[0])
            .delay(TaskLabel::Performance, delays[1])
            .delay(TaskLabel::Architecture, delays[2])
            .delay(TaskLabel::Testing, delays[3]);
        let state = orchestrator.run(LONG_INPUT, "load.py", &jittered).unwrap();

        prop_assert_eq!(state.findings(), baseline.findings());
        prop_assert_eq!(state.summaries(), baseline.summaries());
    }
}
