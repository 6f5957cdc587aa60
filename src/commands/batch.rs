use super::{resolve_config, task_backend};
use crate::cli::{BatchArgs, GlobalArgs};
use crate::io;
use crate::pipeline::Orchestrator;
use crate::progress::ProgressConfig;
use crate::report::{BatchEntry, BatchReport, ReviewResults};
use crate::tasks::TaskInvoker;
use anyhow::{Context, Result};
use chrono::Local;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

pub fn handle_batch(args: BatchArgs, global: &GlobalArgs) -> Result<()> {
    let config = resolve_config(global)?;
    let files = collect_files(&args.directory, &args.extensions);
    if files.is_empty() {
        println!(
            "No files with extensions [{}] found in {}",
            args.extensions.join(", "),
            args.directory.display()
        );
        return Ok(());
    }
    info!(count = files.len(), "Starting batch review");

    let invoker = task_backend(args.demo, &config)?;
    let now = Local::now();
    let orchestrator = Orchestrator::new(config)?
        .with_timestamp(now.format(io::DISPLAY_STAMP_FORMAT).to_string());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.jobs.unwrap_or(0))
        .build()
        .context("Failed to build the batch thread pool")?;

    let bar = ProgressConfig::from_env(global.quiet).create_bar(files.len() as u64, "Reviewing");
    let results: Vec<BatchEntry> = pool.install(|| {
        files
            .par_iter()
            .map(|path| {
                let entry = review_file(&orchestrator, invoker.as_ref(), &args.directory, path);
                bar.inc(1);
                entry
            })
            .collect()
    });
    bar.finish_and_clear();

    for entry in &results {
        match entry {
            BatchEntry::Reviewed(review) => println!(
                "  {}: {} issues ({} critical)",
                review.filename, review.summary.total_issues, review.summary.critical_issues
            ),
            BatchEntry::Failed { filename, error } => println!("  {filename}: failed ({error})"),
        }
    }

    let report = BatchReport {
        date: now.to_rfc3339(),
        directory: args.directory.display().to_string(),
        files_reviewed: results.iter().filter(|r| !r.is_failure()).count(),
        results,
    };
    let output = args.output.unwrap_or_else(|| io::batch_report_path(&now));
    io::write_json(&output, &report)?;
    println!(
        "\nReviewed {} files. Batch results saved to: {}",
        report.files_reviewed,
        output.display()
    );
    Ok(())
}

/// Files under `root` whose extension is in `extensions`, sorted.
pub fn collect_files(root: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let wanted: Vec<String> = extensions
        .iter()
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .collect();

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.to_string_lossy().to_lowercase())
                .is_some_and(|ext| wanted.contains(&ext))
        })
        .collect();
    files.sort();
    files
}

/// Review one file. Failures are recorded, never propagated.
fn review_file(
    orchestrator: &Orchestrator,
    invoker: &dyn TaskInvoker,
    root: &Path,
    path: &Path,
) -> BatchEntry {
    let filename = path
        .strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string();

    let outcome = io::read_file(path).and_then(|source| {
        orchestrator
            .run(&source, &filename, invoker)
            .map_err(anyhow::Error::from)
    });

    match outcome {
        Ok(state) => BatchEntry::Reviewed(ReviewResults::from_state(&state)),
        Err(e) => {
            warn!(file = %filename, error = %e, "File review failed");
            BatchEntry::Failed {
                filename,
                error: format!("{e:#}"),
            }
        }
    }
}
