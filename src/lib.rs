// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod extraction;
pub mod formatting;
pub mod io;
pub mod pipeline;
pub mod progress;
pub mod report;
pub mod tasks;

// Re-export commonly used types
pub use crate::config::ReviewConfig;
pub use crate::core::{Finding, Severity, SeverityCounts, TaskLabel};
pub use crate::errors::{PipelineError, TaskError};
pub use crate::pipeline::{run, Orchestrator, PipelineGraph, PipelineState, StageId};
pub use crate::report::ReviewResults;
pub use crate::tasks::{AnthropicInvoker, CannedInvoker, TaskInvoker};
