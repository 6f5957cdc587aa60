//! Progress feedback for reviews, drawn on stderr with `indicatif`.
//!
//! - **Quiet mode**: no output (`--quiet` or `REVIEW_COUNCIL_QUIET`)
//! - **Non-TTY**: bars are hidden in CI and piped output

use crate::pipeline::{PipelineObserver, StageId};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

pub const TEMPLATE_SPINNER: &str = "{spinner} {msg} [{elapsed}]";
pub const TEMPLATE_FILES: &str = "📁 {msg} {pos}/{len} files ({percent}%) - {eta}";

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

#[derive(Debug, Clone, Default)]
pub struct ProgressConfig {
    pub quiet_mode: bool,
}

impl ProgressConfig {
    pub fn from_env(quiet: bool) -> Self {
        Self {
            quiet_mode: quiet || std::env::var("REVIEW_COUNCIL_QUIET").is_ok(),
        }
    }

    pub fn should_show_progress(&self) -> bool {
        !self.quiet_mode && std::io::stderr().is_terminal()
    }

    /// Bar over `len` files; hidden when progress is off.
    pub fn create_bar(&self, len: u64, msg: &str) -> ProgressBar {
        if !self.should_show_progress() {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(TEMPLATE_FILES)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓▒░  "),
        );
        pb.set_message(msg.to_string());
        pb
    }

    pub fn create_spinner(&self, msg: &str) -> ProgressBar {
        if !self.should_show_progress() {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template(TEMPLATE_SPINNER)
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars(TICK_CHARS),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

/// Spinner that follows the pipeline stage by stage.
pub struct StageSpinner {
    bar: ProgressBar,
    total: usize,
}

impl StageSpinner {
    pub fn new(config: &ProgressConfig, total_stages: usize) -> Self {
        Self {
            bar: config.create_spinner("Starting review"),
            total: total_stages,
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl PipelineObserver for StageSpinner {
    fn stage_started(&self, stage: StageId, name: &str) {
        let position = StageId::ALL
            .iter()
            .position(|s| *s == stage)
            .map_or(0, |i| i + 1);
        self.bar
            .set_message(format!("[{}/{}] {}", position, self.total, name));
    }

    fn stage_finished(&self, _stage: StageId, _elapsed: Duration) {
        self.bar.tick();
    }
}
