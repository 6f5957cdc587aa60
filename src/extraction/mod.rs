//! Text mining over free-form task output.
//!
//! All three passes are pure functions of the raw text:
//!
//! - [`findings::extract`] turns list-shaped output into [`Finding`] records,
//!   each with its own severity.
//! - [`severity::classify`] gives the whole output one coarse tone count.
//! - [`digest::digest`] picks a single line to summarize the output.
//!
//! None of them can fail. Text that does not fit the expected shape falls
//! back to default values.
//!
//! [`Finding`]: crate::core::Finding

pub mod digest;
pub mod findings;
pub mod severity;

pub use digest::digest;
pub use findings::extract;
pub use severity::classify;

/// Truncate to at most `max` characters, trimming any trailing whitespace
/// left at the cut.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => text[..byte_idx].trim_end().to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_short_input_unchanged() {
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[test]
    fn test_truncate_chars_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("ééééé", 3), "ééé");
    }

    #[test]
    fn test_truncate_chars_trims_cut_whitespace() {
        assert_eq!(truncate_chars("abc def", 4), "abc");
    }
}
