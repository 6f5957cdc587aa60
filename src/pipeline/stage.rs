//! Pipeline stages.
//!
//! A stage is a named unit of work that reads and mutates a
//! [`PipelineState`]. Four kinds exist:
//!
//! - [`InitializeStage`] splits the input and computes the skip flag.
//! - [`TaskStage`] runs exactly one task.
//! - [`ParallelPairStage`] runs two tasks on their own threads and joins
//!   both before merging.
//! - [`FinalizeStage`] renders both reports and freezes the state.
//!
//! Tasks never touch the state directly. Each one produces a
//! [`TaskOutcome`], and [`merge_outcomes`] folds outcomes into the state in
//! a fixed order on the calling thread.

use super::context;
use super::state::PipelineState;
use crate::config::ReviewConfig;
use crate::core::{Finding, Severity, SeverityCounts, TaskLabel};
use crate::errors::{PipelineError, Result, TaskError};
use crate::extraction;
use crate::formatting::{self, FormattingConfig};
use crate::report;
use crate::tasks::TaskInvoker;
use serde::Serialize;
use tracing::{debug, warn};

/// Prefix of the digest recorded for a task whose invocation failed.
pub const FAILURE_DIGEST_PREFIX: &str = "Analysis failed: ";

/// Identifiers of the stages in the review graph.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    Initialize,
    SyntaxAnalysis,
    SecurityPerformance,
    ArchitectureTesting,
    DocumentationAnalysis,
    GenerateReport,
}

impl StageId {
    pub const ALL: [StageId; 6] = [
        StageId::Initialize,
        StageId::SyntaxAnalysis,
        StageId::SecurityPerformance,
        StageId::ArchitectureTesting,
        StageId::DocumentationAnalysis,
        StageId::GenerateReport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::SyntaxAnalysis => "syntax_analysis",
            Self::SecurityPerformance => "security_performance",
            Self::ArchitectureTesting => "architecture_testing",
            Self::DocumentationAnalysis => "documentation_analysis",
            Self::GenerateReport => "generate_report",
        }
    }
}

impl std::fmt::Display for StageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageKind {
    Initialize,
    Sequential,
    ParallelPair,
    Finalize,
}

/// Read-only services available to every stage.
pub struct StageContext<'a> {
    pub invoker: &'a dyn TaskInvoker,
    pub config: &'a ReviewConfig,
    pub formatting: FormattingConfig,
}

/// A node of the pipeline graph.
pub trait Stage: Send + Sync {
    fn id(&self) -> StageId;

    /// Stage name for progress reporting.
    fn name(&self) -> &str;

    fn kind(&self) -> StageKind;

    /// Tasks whose outcomes this stage may merge.
    fn tasks(&self) -> &[TaskLabel] {
        &[]
    }

    fn execute(&self, state: &mut PipelineState, ctx: &StageContext<'_>) -> Result<()>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskStatus {
    Completed,
    Failed(TaskError),
    /// Turned off by configuration; nothing was invoked
    Disabled,
}

/// Local result of one task, computed off the state and merged later.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskOutcome {
    pub task: TaskLabel,
    pub status: TaskStatus,
    pub findings: Vec<Finding>,
    pub digest: Option<String>,
    pub tone: SeverityCounts,
}

impl TaskOutcome {
    /// Run the extraction passes over a task's raw output.
    pub fn from_output(task: TaskLabel, raw_text: &str) -> Self {
        Self {
            task,
            status: TaskStatus::Completed,
            findings: extraction::extract(raw_text, task),
            digest: Some(extraction::digest(raw_text)),
            tone: extraction::classify(raw_text),
        }
    }

    pub fn failed(task: TaskLabel, error: TaskError) -> Self {
        Self {
            task,
            digest: Some(format!("{FAILURE_DIGEST_PREFIX}{error}")),
            status: TaskStatus::Failed(error),
            findings: Vec::new(),
            tone: SeverityCounts::default(),
        }
    }

    pub fn disabled(task: TaskLabel) -> Self {
        Self {
            task,
            status: TaskStatus::Disabled,
            findings: Vec::new(),
            digest: None,
            tone: SeverityCounts::default(),
        }
    }

    pub fn has_critical(&self) -> bool {
        self.findings
            .iter()
            .any(|f| f.severity == Severity::Critical)
    }
}

/// Invoke `task` unless it is disabled, absorbing any failure.
pub fn run_task(task: TaskLabel, input: &str, ctx: &StageContext<'_>) -> TaskOutcome {
    if !ctx.config.tasks.is_enabled(task) {
        debug!(task = %task, "Task disabled, skipping");
        return TaskOutcome::disabled(task);
    }

    match ctx.invoker.invoke(task, input, &ctx.config.execution) {
        Ok(raw) => {
            let outcome = TaskOutcome::from_output(task, &raw);
            debug!(
                task = %task,
                findings = outcome.findings.len(),
                "Task completed"
            );
            outcome
        }
        Err(err) => {
            warn!(task = %task, error = %err, "Task failed, continuing without its findings");
            TaskOutcome::failed(task, err)
        }
    }
}

/// Fold outcomes into `state` in label order.
///
/// Every outcome must belong to one of `stage`'s tasks; otherwise nothing is
/// merged and [`PipelineError::UnknownTask`] is returned.
pub fn merge_outcomes(
    stage: &dyn Stage,
    state: &mut PipelineState,
    mut outcomes: Vec<TaskOutcome>,
) -> Result<()> {
    if let Some(stray) = outcomes.iter().find(|o| !stage.tasks().contains(&o.task)) {
        return Err(PipelineError::UnknownTask {
            stage: stage.id(),
            task: stray.task,
        });
    }

    outcomes.sort_by_key(|o| o.task.label());
    for outcome in outcomes {
        let (task, critical) = (outcome.task, outcome.has_critical());
        state.update_flags(|flags| context::after_task(task, critical, flags))?;
        state.merge(outcome)?;
    }
    Ok(())
}

pub struct InitializeStage;

impl Stage for InitializeStage {
    fn id(&self) -> StageId {
        StageId::Initialize
    }

    fn name(&self) -> &str {
        "Initialize review"
    }

    fn kind(&self) -> StageKind {
        StageKind::Initialize
    }

    fn execute(&self, state: &mut PipelineState, ctx: &StageContext<'_>) -> Result<()> {
        state.initialize()?;
        let code_lines = context::code_line_count(state.input_lines());
        let min_lines = ctx.config.pipeline.documentation_min_lines;
        state.update_flags(|flags| context::initial_flags(flags, code_lines, min_lines))?;
        debug!(
            lines = state.input_lines().len(),
            code_lines,
            skip_documentation = state.flags().skip_documentation,
            "Input initialized"
        );
        Ok(())
    }
}

/// Runs a single task.
pub struct TaskStage {
    id: StageId,
    name: String,
    task: [TaskLabel; 1],
}

impl TaskStage {
    pub fn new(id: StageId, name: impl Into<String>, task: TaskLabel) -> Self {
        Self {
            id,
            name: name.into(),
            task: [task],
        }
    }
}

impl Stage for TaskStage {
    fn id(&self) -> StageId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StageKind {
        StageKind::Sequential
    }

    fn tasks(&self) -> &[TaskLabel] {
        &self.task
    }

    fn execute(&self, state: &mut PipelineState, ctx: &StageContext<'_>) -> Result<()> {
        state.update_flags(|flags| context::before_stage(self.id, flags))?;
        let task = self.task[0];
        let outcome = run_task(task, &context::task_input(task, state), ctx);
        merge_outcomes(self, state, vec![outcome])
    }
}

/// Runs two tasks concurrently and merges them after both return.
pub struct ParallelPairStage {
    id: StageId,
    name: String,
    tasks: [TaskLabel; 2],
}

impl ParallelPairStage {
    pub fn new(id: StageId, name: impl Into<String>, tasks: [TaskLabel; 2]) -> Self {
        Self {
            id,
            name: name.into(),
            tasks,
        }
    }
}

impl Stage for ParallelPairStage {
    fn id(&self) -> StageId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StageKind {
        StageKind::ParallelPair
    }

    fn tasks(&self) -> &[TaskLabel] {
        &self.tasks
    }

    fn execute(&self, state: &mut PipelineState, ctx: &StageContext<'_>) -> Result<()> {
        state.update_flags(|flags| context::before_stage(self.id, flags))?;

        // Inputs are fixed before either task starts.
        let snapshot: &PipelineState = state;
        let [first, second] = self
            .tasks
            .map(|task| (task, context::task_input(task, snapshot)));

        // Task calls block on HTTP; batch runs this inside its rayon pool.
        let outcomes = std::thread::scope(|scope| {
            let handles = [first, second].map(|(task, input)| {
                let handle = scope.spawn(move || run_task(task, &input, ctx));
                (task, handle)
            });
            handles.map(|(task, handle)| {
                handle.join().unwrap_or_else(|_| {
                    warn!(task = %task, "Task thread panicked");
                    TaskOutcome::failed(task, TaskError::other("task panicked"))
                })
            })
        });

        merge_outcomes(self, state, outcomes.into())
    }
}

/// Renders both reports and freezes the state.
pub struct FinalizeStage;

impl Stage for FinalizeStage {
    fn id(&self) -> StageId {
        StageId::GenerateReport
    }

    fn name(&self) -> &str {
        "Generate reports"
    }

    fn kind(&self) -> StageKind {
        StageKind::Finalize
    }

    fn execute(&self, state: &mut PipelineState, ctx: &StageContext<'_>) -> Result<()> {
        let formatter = formatting::formatter_for(ctx.formatting);
        let summary = report::render_summary(state, formatter.as_ref());
        let detailed = report::render_report(state);
        state.finalize(summary, detailed)
    }
}
