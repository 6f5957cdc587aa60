//! Task backends.
//!
//! The pipeline sees a task only through [`TaskInvoker`]: text in, text out,
//! possibly failing. Two backends ship with the crate:
//!
//! - [`CannedInvoker`] replays fixed outputs (demo mode and tests).
//! - [`AnthropicInvoker`] calls the Anthropic Messages API.

mod anthropic;
mod canned;
pub mod prompts;

pub use anthropic::{AnthropicInvoker, API_KEY_ENV};
pub use canned::{CannedInvoker, SAMPLE_FILENAME, SAMPLE_INPUT};

use crate::config::ExecutionParams;
use crate::core::TaskLabel;
use crate::errors::TaskError;

/// Capability that runs one analysis task over input text.
///
/// Implementations are called concurrently from the parallel stages.
pub trait TaskInvoker: Send + Sync {
    fn invoke(
        &self,
        task: TaskLabel,
        input: &str,
        params: &ExecutionParams,
    ) -> Result<String, TaskError>;
}

impl<F> TaskInvoker for F
where
    F: Fn(TaskLabel, &str, &ExecutionParams) -> Result<String, TaskError> + Send + Sync,
{
    fn invoke(
        &self,
        task: TaskLabel,
        input: &str,
        params: &ExecutionParams,
    ) -> Result<String, TaskError> {
        self(task, input, params)
    }
}
