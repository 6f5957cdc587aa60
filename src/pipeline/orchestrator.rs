//! Drives a [`PipelineGraph`] from its entry stage to termination.

use super::graph::PipelineGraph;
use super::observer::{NoopObserver, PipelineObserver};
use super::stage::{StageContext, StageId};
use super::state::PipelineState;
use crate::config::ReviewConfig;
use crate::errors::{PipelineError, Result};
use crate::formatting::FormattingConfig;
use crate::tasks::TaskInvoker;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::{debug, info, info_span};

/// Timing information for a pipeline stage.
#[derive(Debug, Clone)]
pub struct StageTiming {
    pub stage: StageId,

    /// Name of the stage
    pub name: String,

    /// Time taken to execute the stage
    pub duration: Duration,
}

impl StageTiming {
    /// Format the timing as a human-readable string.
    pub fn format(&self) -> String {
        format!("{}: {:.2}s", self.name, self.duration.as_secs_f64())
    }
}

/// Runs reviews over a fixed graph and configuration.
///
/// Apart from invoking tasks the orchestrator performs no I/O, so given
/// identical task outputs a run is deterministic. The timestamp and the
/// formatting mode are supplied by the caller.
pub struct Orchestrator {
    graph: PipelineGraph,
    config: ReviewConfig,
    formatting: FormattingConfig,
    timestamp: Option<String>,
}

impl Orchestrator {
    /// Orchestrator over the standard review graph.
    pub fn new(config: ReviewConfig) -> Result<Self> {
        Ok(Self::with_graph(PipelineGraph::standard()?, config))
    }

    pub fn with_graph(graph: PipelineGraph, config: ReviewConfig) -> Self {
        Self {
            graph,
            config,
            formatting: FormattingConfig::plain(),
            timestamp: None,
        }
    }

    /// Formatting used for the terminal summary.
    pub fn with_formatting(mut self, formatting: FormattingConfig) -> Self {
        self.formatting = formatting;
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn graph(&self) -> &PipelineGraph {
        &self.graph
    }

    pub fn run(
        &self,
        input_text: &str,
        filename: &str,
        invoker: &dyn TaskInvoker,
    ) -> Result<PipelineState> {
        self.run_with_timing(input_text, filename, invoker, &NoopObserver)
            .map(|(state, _)| state)
    }

    /// Run the review and collect per-stage timings.
    ///
    /// Timings are returned beside the state rather than inside it so the
    /// state stays a deterministic function of the task outputs.
    pub fn run_with_timing(
        &self,
        input_text: &str,
        filename: &str,
        invoker: &dyn TaskInvoker,
        observer: &dyn PipelineObserver,
    ) -> Result<(PipelineState, Vec<StageTiming>)> {
        let _run = info_span!("review", file = filename).entered();

        let mut state = PipelineState::new(input_text, filename);
        if let Some(timestamp) = &self.timestamp {
            state = state.with_timestamp(timestamp.clone());
        }

        let ctx = StageContext {
            invoker,
            config: &self.config,
            formatting: self.formatting,
        };

        let mut executed = HashSet::new();
        let mut timings = Vec::new();
        let mut current = Some(self.graph.entry());

        while let Some(id) = current {
            if !executed.insert(id) {
                return Err(PipelineError::StageRepeated(id));
            }
            let stage = self.graph.stage(id).ok_or_else(|| {
                PipelineError::invalid_graph(format!("stage '{id}' is not registered"))
            })?;

            let _span = info_span!("stage", stage = %id).entered();
            info!("Stage {}/{}: {}", executed.len(), self.graph.stage_count(), stage.name());
            observer.stage_started(id, stage.name());

            let start = Instant::now();
            stage.execute(&mut state, &ctx)?;
            let duration = start.elapsed();

            observer.stage_finished(id, duration);
            debug!(elapsed_ms = duration.as_millis() as u64, "Stage finished");
            timings.push(StageTiming {
                stage: id,
                name: stage.name().to_string(),
                duration,
            });

            current = self.graph.next(id, &state);
        }

        if !state.is_finalized() {
            return Err(PipelineError::invalid_graph(
                "run ended without reaching the report stage",
            ));
        }

        info!(
            total = state.total_issues(),
            critical = state.counts().critical,
            "Review complete"
        );
        Ok((state, timings))
    }
}

/// Review `input_text` with the default configuration and standard graph.
pub fn run(input_text: &str, filename: &str, invoker: &dyn TaskInvoker) -> Result<PipelineState> {
    Orchestrator::new(ReviewConfig::default())?.run(input_text, filename, invoker)
}
