//! Finding extraction from list-shaped task output.
//!
//! Rules, applied to each trimmed line in order:
//!
//! 1. While a finding is open, a line starting with `Fix:`, `- Fix:` or
//!    `Solution:` becomes its `fix` (first one wins) and never opens a new
//!    finding.
//! 2. A line starting with a numbered marker (`1.`, `1)`, `1:`) or a bullet
//!    (`-`, `•`, `*`, `►`) closes the open finding and opens a new one.
//! 3. Everything else is ignored.
//!
//! When no finding is produced from non-empty prose that never says "no" or
//! "adequate", one synthetic suggestion is emitted from its first line.

use super::severity::{first_match, FINDING_RULES};
use super::truncate_chars;
use crate::core::{Finding, Severity, TaskLabel};
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum stored issue length, in characters.
pub const MAX_ISSUE_CHARS: usize = 200;

/// Maximum length of the synthetic issue taken from prose output.
pub const FALLBACK_ISSUE_CHARS: usize = 100;

const FIX_PREFIXES: &[&str] = &["Fix:", "- Fix:", "Solution:"];

const BULLET_MARKERS: &[char] = &['-', '•', '*', '►'];

const NEGATIVE_WORDS: &[&str] = &["no", "adequate"];

static NUMBERED_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[.):]").unwrap());

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Extract findings from `raw_text`, in the order they appear.
pub fn extract(raw_text: &str, source: TaskLabel) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut open: Option<Finding> = None;

    for line in raw_text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if is_fix_line(line) {
            if let Some(current) = open.as_mut() {
                if current.fix.is_empty() {
                    current.fix = line.to_string();
                }
            }
            continue;
        }

        let Some(body) = strip_marker(line) else {
            continue;
        };
        let issue = normalize_issue(body);
        if !issue.chars().any(char::is_alphanumeric) {
            continue;
        }

        if let Some(done) = open.take() {
            findings.push(done);
        }
        open = Some(Finding::new(
            source,
            parse_line_reference(line),
            issue,
            finding_severity(line),
        ));
    }

    if let Some(done) = open {
        findings.push(done);
    }

    if findings.is_empty() {
        if let Some(fallback) = prose_fallback(raw_text, source) {
            findings.push(fallback);
        }
    }

    findings
}

fn is_fix_line(line: &str) -> bool {
    FIX_PREFIXES.iter().any(|prefix| line.starts_with(prefix))
}

/// Return the text after a list marker, or `None` for non-list lines.
///
/// A leading `**` is markdown emphasis rather than a `*` bullet.
fn strip_marker(line: &str) -> Option<&str> {
    if let Some(m) = NUMBERED_MARKER.find(line) {
        return Some(&line[m.end()..]);
    }
    if line.starts_with("**") {
        return None;
    }
    let first = line.chars().next()?;
    BULLET_MARKERS
        .contains(&first)
        .then(|| &line[first.len_utf8()..])
}

/// Drop emphasis markers, collapse whitespace and cap the length.
///
/// Applying this to its own output changes nothing.
fn normalize_issue(body: &str) -> String {
    let plain = body.replace("**", "");
    let collapsed = WHITESPACE_RUN.replace_all(plain.trim(), " ");
    truncate_chars(&collapsed, MAX_ISSUE_CHARS)
}

/// Severity of a whole marker line, before the issue is shortened.
fn finding_severity(line: &str) -> Severity {
    first_match(&line.to_lowercase(), FINDING_RULES).unwrap_or(Severity::Suggestion)
}

/// Parse the number that follows `Line` on a line that also has a `:`.
///
/// Only the text between `Line` and the next `:` is considered. Its first
/// whitespace-delimited token, stripped of surrounding punctuation such as
/// `(`, `#` or `)`, must be all digits. Ranges like `9-12` and tokens like
/// `12abc` yield 0, as does anything else.
pub fn parse_line_reference(line: &str) -> usize {
    if !line.contains(':') {
        return 0;
    }
    let Some((_, after)) = line.split_once("Line") else {
        return 0;
    };
    let segment = after.split(':').next().unwrap_or_default();
    segment
        .split_whitespace()
        .next()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|token| !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()))
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}

fn prose_fallback(raw_text: &str, source: TaskLabel) -> Option<Finding> {
    if raw_text.trim().is_empty() {
        return None;
    }
    let lowered = raw_text.to_lowercase();
    if NEGATIVE_WORDS.iter().any(|word| lowered.contains(word)) {
        return None;
    }
    let first_line = raw_text.lines().map(str::trim).find(|l| !l.is_empty())?;
    Some(Finding::new(
        source,
        0,
        truncate_chars(first_line, FALLBACK_ISSUE_CHARS),
        Severity::Suggestion,
    ))
}
