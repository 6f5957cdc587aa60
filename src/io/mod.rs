//! File input and report persistence.

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default name of the JSON results file for a single review.
pub const RESULTS_FILE: &str = "ReviewResults.json";

/// Timestamp format used in generated file names.
pub const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Timestamp format shown inside reports.
pub const DISPLAY_STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {}", path.display()))?;
    }
    Ok(())
}

/// Pretty-printed JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize results")?;
    write_file(path, &json)
}

/// `<stem>_review_<YYYYmmdd_HHMMSS>.txt` in the current directory.
pub fn report_path<Tz>(reviewed: &str, at: &DateTime<Tz>) -> PathBuf
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let stem = Path::new(reviewed)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "review".to_string());
    PathBuf::from(format!(
        "{stem}_review_{}.txt",
        at.format(FILE_STAMP_FORMAT)
    ))
}

/// `BatchReview_<YYYYmmdd_HHMMSS>.json` in the current directory.
pub fn batch_report_path<Tz>(at: &DateTime<Tz>) -> PathBuf
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    PathBuf::from(format!("BatchReview_{}.json", at.format(FILE_STAMP_FORMAT)))
}
