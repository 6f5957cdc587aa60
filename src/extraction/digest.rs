//! One-line digest of a task output, used for per-task key findings.

use super::truncate_chars;
use once_cell::sync::Lazy;
use regex::Regex;

/// Digest returned for empty output.
pub const EMPTY_DIGEST: &str = "No issues found";

/// Digest returned when every line is boilerplate.
pub const FALLBACK_DIGEST: &str = "Multiple issues identified";

/// Lines shorter than this are skipped by the first pass.
const MIN_LINE_CHARS: usize = 11;

const MAX_DIGEST_CHARS: usize = 77;

const BOILERPLATE_OPENERS: &[&str] = &[
    "after a comprehensive",
    "here's a comprehensive",
    "here are the",
    "comprehensive analysis",
    "following review",
    "based on analysis",
];

const SIGNAL_WORDS: &[&str] = &[
    "found",
    "identified",
    "detected",
    "issue",
    "vulnerability",
    "problem",
];

static LIST_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[.)]\s*").unwrap());

/// Pick the line that best summarizes `raw_text`.
pub fn digest(raw_text: &str) -> String {
    if raw_text.is_empty() {
        return EMPTY_DIGEST.to_string();
    }

    let candidates: Vec<&str> = raw_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !is_boilerplate(line))
        .collect();

    candidates
        .iter()
        .filter(|line| line.chars().count() >= MIN_LINE_CHARS)
        .find_map(|line| signal_line(line))
        .or_else(|| candidates.first().map(|line| line.to_string()))
        .map(|line| shorten(&line))
        .unwrap_or_else(|| FALLBACK_DIGEST.to_string())
}

fn is_boilerplate(line: &str) -> bool {
    let lowered = line.to_lowercase();
    BOILERPLATE_OPENERS
        .iter()
        .any(|opener| lowered.contains(opener))
}

/// A line that reports something, or a numbered item, with its marker removed.
fn signal_line(line: &str) -> Option<String> {
    let lowered = line.to_lowercase();
    let reports_something = SIGNAL_WORDS.iter().any(|word| lowered.contains(word));
    if reports_something || LIST_MARKER.is_match(line) {
        Some(LIST_MARKER.replace(line, "").into_owned())
    } else {
        None
    }
}

fn shorten(line: &str) -> String {
    if line.chars().count() > MAX_DIGEST_CHARS {
        format!("{}...", truncate_chars(line, MAX_DIGEST_CHARS))
    } else {
        line.to_string()
    }
}
