use super::review::{print_summary, save_outputs};
use super::resolve_config;
use crate::cli::{DemoArgs, GlobalArgs};
use crate::io;
use crate::pipeline::Orchestrator;
use crate::progress::{ProgressConfig, StageSpinner};
use crate::tasks::{CannedInvoker, SAMPLE_FILENAME, SAMPLE_INPUT};
use anyhow::{Context, Result};
use chrono::Local;

pub fn handle_demo(args: DemoArgs, global: &GlobalArgs) -> Result<()> {
    let config = resolve_config(global)?;
    let now = Local::now();
    let orchestrator = Orchestrator::new(config)?
        .with_formatting(global.formatting())
        .with_timestamp(now.format(io::DISPLAY_STAMP_FORMAT).to_string());

    println!("Reviewing built-in sample {SAMPLE_FILENAME} with canned task output.");
    println!("No API calls are made; real reviews depend on your code.");

    let spinner = StageSpinner::new(
        &ProgressConfig::from_env(global.quiet),
        orchestrator.graph().stage_count(),
    );
    let outcome = orchestrator.run_with_timing(
        SAMPLE_INPUT,
        SAMPLE_FILENAME,
        &CannedInvoker::demo(),
        &spinner,
    );
    spinner.finish();
    let (state, _) = outcome.context("Demo pipeline failed")?;

    print_summary(&state, None);

    if args.save {
        save_outputs(&state, &io::report_path("demo", &now), &args.json)?;
    } else {
        println!("\nRun with --save to write the detailed report and JSON results.");
    }
    Ok(())
}
