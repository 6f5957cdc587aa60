pub mod batch;
pub mod demo;
pub mod init;
pub mod review;

use crate::cli::GlobalArgs;
use crate::config::{self, ReviewConfig};
use crate::core::TaskLabel;
use crate::tasks::{AnthropicInvoker, CannedInvoker, TaskInvoker};
use anyhow::{Context, Result};
use std::time::Duration;

/// Explicit `--config` must load; otherwise discover from the working
/// directory.
pub fn resolve_config(global: &GlobalArgs) -> Result<ReviewConfig> {
    match &global.config {
        Some(path) => config::load_config_from(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(config::load_config()),
    }
}

/// Turn off the tasks named in `keys`.
pub fn apply_disabled(config: &mut ReviewConfig, keys: &[String]) -> Result<()> {
    for key in keys {
        let task = TaskLabel::from_label(key.trim())
            .with_context(|| format!("Unknown task '{key}'"))?;
        config.tasks.set_enabled(task, false);
    }
    Ok(())
}

/// Canned backend for demo runs, the Anthropic API otherwise.
pub fn task_backend(demo: bool, config: &ReviewConfig) -> Result<Box<dyn TaskInvoker>> {
    if demo {
        return Ok(Box::new(CannedInvoker::demo()));
    }
    let timeout = Duration::from_secs(config.execution.timeout_secs);
    let invoker = AnthropicInvoker::from_env(timeout)
        .context("Cannot reach the task backend (use --demo to run without an API key)")?;
    Ok(Box::new(invoker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_disabled_accepts_keys_and_labels() {
        let mut config = ReviewConfig::default();
        apply_disabled(&mut config, &["documentation".into(), "Syntax & Logic".into()]).unwrap();

        assert!(!config.tasks.is_enabled(TaskLabel::Documentation));
        assert!(!config.tasks.is_enabled(TaskLabel::SyntaxLogic));
        assert!(config.tasks.is_enabled(TaskLabel::Security));
    }

    #[test]
    fn test_apply_disabled_rejects_unknown_task() {
        let mut config = ReviewConfig::default();
        assert!(apply_disabled(&mut config, &["style".into()]).is_err());
    }

    #[test]
    fn test_demo_backend_needs_no_credentials() {
        assert!(task_backend(true, &ReviewConfig::default()).is_ok());
    }
}
