//! Error types for review operations.
//!
//! Errors fall into three categories:
//!
//! - `TaskError`: a task invocation failed. The orchestrator absorbs these
//!   and records a failure digest for the task; they never abort a run.
//! - `PipelineError`: the stage graph or the merge step is wired wrong.
//!   These abort the run.
//! - `ConfigError`: the configuration file could not be read or parsed.
//!
//! Malformed task output is not an error at all: the extractor falls back
//! to default values instead.

use crate::core::TaskLabel;
use crate::pipeline::StageId;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single task invocation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskError {
    /// The backend has no handler for this task
    #[error("no handler registered for the {0} task")]
    Unregistered(TaskLabel),

    /// Credentials required by the backend are missing
    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    /// The remote call failed
    #[error("request failed: {0}")]
    Transport(String),

    /// The remote side answered but produced no text
    #[error("empty response from {0} task")]
    EmptyResponse(TaskLabel),

    /// Any other backend failure
    #[error("{0}")]
    Other(String),
}

impl TaskError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

/// Structural error in the pipeline graph or its merge step.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PipelineError {
    /// A stage was reached a second time within one run
    #[error("stage '{0}' executed more than once")]
    StageRepeated(StageId),

    /// A result was merged for a task the stage does not own
    #[error("stage '{stage}' produced a result for {task}, which it does not run")]
    UnknownTask { stage: StageId, task: TaskLabel },

    /// State was mutated after the terminal stage completed
    #[error("pipeline state is finalized and can no longer change")]
    Finalized,

    /// The graph shape is invalid
    #[error("invalid pipeline graph: {0}")]
    InvalidGraph(String),
}

impl PipelineError {
    pub fn invalid_graph(message: impl Into<String>) -> Self {
        Self::InvalidGraph(message.into())
    }
}

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_error_display() {
        let err = TaskError::Unregistered(TaskLabel::Security);
        assert_eq!(err.to_string(), "no handler registered for the Security task");

        let err = TaskError::transport("connection reset");
        assert_eq!(err.to_string(), "request failed: connection reset");
    }

    #[test]
    fn test_pipeline_error_display() {
        let err = PipelineError::UnknownTask {
            stage: StageId::SyntaxAnalysis,
            task: TaskLabel::Testing,
        };
        assert_eq!(
            err.to_string(),
            "stage 'syntax_analysis' produced a result for Testing, which it does not run"
        );
    }

    #[test]
    fn test_config_error_keeps_source() {
        use std::error::Error as _;
        let err = ConfigError::Read {
            path: PathBuf::from(".review-council.toml"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
    }
}
