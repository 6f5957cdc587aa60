//! Review configuration.
//!
//! Loaded from `.review-council.toml` (see [`loader`]). Every table and key
//! is optional and falls back to the defaults below.

mod loader;

pub use loader::{
    directory_ancestors, load_config, load_config_from, load_config_from_dir, parse_config,
    CONFIG_FILE_NAME,
};

use crate::core::TaskLabel;
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// Default configuration written by `review-council init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# Review Council configuration

[execution]
# Passed to the task backend unchanged
model = "claude-3-5-haiku-20241022"
temperature = 0.3
max_tokens = 4096
timeout_secs = 120

[tasks]
syntax_logic = true
security = true
performance = true
architecture = true
testing = true
documentation = true

[pipeline]
# Documentation analysis is skipped below this many code lines
documentation_min_lines = 10
"#;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReviewConfig {
    pub execution: ExecutionParams,
    pub tasks: TaskToggles,
    pub pipeline: PipelineSettings,
}

impl ReviewConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.execution.validate()
    }
}

/// Generation knobs handed to the task backend. The pipeline never reads
/// them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExecutionParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Request timeout for remote backends
    pub timeout_secs: u64,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            model: "claude-3-5-haiku-20241022".to_string(),
            temperature: 0.3,
            max_tokens: 4096,
            timeout_secs: 120,
        }
    }
}

impl ExecutionParams {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("execution.model is empty".into()));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid(format!(
                "execution.temperature must be within 0.0..=1.0, got {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::Invalid(
                "execution.max_tokens must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Enable flag per task. Absent keys mean enabled.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TaskToggles {
    pub syntax_logic: bool,
    pub security: bool,
    pub performance: bool,
    pub architecture: bool,
    pub testing: bool,
    pub documentation: bool,
}

impl Default for TaskToggles {
    fn default() -> Self {
        Self {
            syntax_logic: true,
            security: true,
            performance: true,
            architecture: true,
            testing: true,
            documentation: true,
        }
    }
}

impl TaskToggles {
    fn slot(&mut self, task: TaskLabel) -> &mut bool {
        match task {
            TaskLabel::SyntaxLogic => &mut self.syntax_logic,
            TaskLabel::Security => &mut self.security,
            TaskLabel::Performance => &mut self.performance,
            TaskLabel::Architecture => &mut self.architecture,
            TaskLabel::Testing => &mut self.testing,
            TaskLabel::Documentation => &mut self.documentation,
        }
    }

    pub fn is_enabled(&self, task: TaskLabel) -> bool {
        match task {
            TaskLabel::SyntaxLogic => self.syntax_logic,
            TaskLabel::Security => self.security,
            TaskLabel::Performance => self.performance,
            TaskLabel::Architecture => self.architecture,
            TaskLabel::Testing => self.testing,
            TaskLabel::Documentation => self.documentation,
        }
    }

    pub fn set_enabled(&mut self, task: TaskLabel, enabled: bool) {
        *self.slot(task) = enabled;
    }

    pub fn enabled(&self) -> Vec<TaskLabel> {
        TaskLabel::ALL
            .into_iter()
            .filter(|task| self.is_enabled(*task))
            .collect()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PipelineSettings {
    /// Minimum non-blank, non-comment lines for documentation analysis
    pub documentation_min_lines: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            documentation_min_lines: 10,
        }
    }
}
