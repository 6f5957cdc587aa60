use super::{apply_disabled, resolve_config, task_backend};
use crate::cli::{GlobalArgs, ReviewArgs};
use crate::io;
use crate::pipeline::{Orchestrator, PipelineState, StageTiming};
use crate::progress::{ProgressConfig, StageSpinner};
use crate::report::ReviewResults;
use anyhow::{Context, Result};
use chrono::Local;
use std::path::Path;
use tracing::info;

pub fn handle_review(args: ReviewArgs, global: &GlobalArgs) -> Result<()> {
    let mut config = resolve_config(global)?;
    apply_disabled(&mut config, &args.disable)?;

    let source = io::read_file(&args.file)?;
    let filename = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.file.display().to_string());
    info!(file = %filename, lines = source.lines().count(), "Reviewing file");

    let invoker = task_backend(args.demo, &config)?;
    let now = Local::now();
    let orchestrator = Orchestrator::new(config)?
        .with_formatting(global.formatting())
        .with_timestamp(now.format(io::DISPLAY_STAMP_FORMAT).to_string());

    let spinner = StageSpinner::new(
        &ProgressConfig::from_env(global.quiet),
        orchestrator.graph().stage_count(),
    );
    let outcome = orchestrator.run_with_timing(&source, &filename, invoker.as_ref(), &spinner);
    spinner.finish();
    let (state, timings) = outcome.context("Review pipeline failed")?;

    print_summary(&state, args.timings.then_some(timings.as_slice()));

    if args.no_save {
        return Ok(());
    }
    let report_path = args
        .report
        .unwrap_or_else(|| io::report_path(&filename, &now));
    save_outputs(&state, &report_path, &args.json)
}

pub(crate) fn print_summary(state: &PipelineState, timings: Option<&[StageTiming]>) {
    if let Some(summary) = state.summary_text() {
        println!("\n{summary}");
    }
    if let Some(timings) = timings {
        println!("\nStage timings:");
        for timing in timings {
            println!("   {}", timing.format());
        }
    }
}

/// Write the detailed report and the JSON results.
pub(crate) fn save_outputs(
    state: &PipelineState,
    report_path: &Path,
    json_path: &Path,
) -> Result<()> {
    let report = state
        .report_text()
        .context("Review finished without a detailed report")?;
    io::write_file(report_path, report)?;
    println!("Detailed report saved to: {}", report_path.display());

    io::write_json(json_path, &ReviewResults::from_state(state))?;
    println!("JSON results saved to: {}", json_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::run;
    use crate::tasks::{CannedInvoker, SAMPLE_FILENAME, SAMPLE_INPUT};
    use tempfile::TempDir;

    #[test]
    fn test_save_outputs_writes_both_files() {
        let dir = TempDir::new().unwrap();
        let state = run(SAMPLE_INPUT, SAMPLE_FILENAME, &CannedInvoker::demo()).unwrap();
        let report = dir.path().join("example_review.txt");
        let json = dir.path().join("results.json");

        save_outputs(&state, &report, &json).unwrap();

        let text = io::read_file(&report).unwrap();
        assert!(text.starts_with(&"=".repeat(80)));
        assert!(text.contains("CODE REVIEW REPORT - example.py"));
        let results: serde_json::Value =
            serde_json::from_str(&io::read_file(&json).unwrap()).unwrap();
        assert_eq!(results["filename"], "example.py");
    }
}
