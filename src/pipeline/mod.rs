//! Review pipeline: a DAG of stages executed in dependency order over one
//! shared [`PipelineState`].
//!
//! # Example
//!
//! ```rust,ignore
//! use review_council::pipeline::{Orchestrator, PipelineGraph};
//! use review_council::tasks::CannedInvoker;
//!
//! let orchestrator = Orchestrator::new(ReviewConfig::default())?;
//! let state = orchestrator.run(&source, "app.py", &CannedInvoker::demo())?;
//! println!("{}", state.summary_text().unwrap_or_default());
//! ```

pub mod context;
pub mod graph;
pub mod observer;
pub mod orchestrator;
pub mod stage;
pub mod state;

pub use graph::{PipelineGraph, PipelineGraphBuilder, Transition};
pub use observer::{NoopObserver, PipelineObserver};
pub use orchestrator::{run, Orchestrator, StageTiming};
pub use stage::{Stage, StageId, StageKind, TaskOutcome, TaskStatus, FAILURE_DIGEST_PREFIX};
pub use state::{PipelineState, RoutingFlags};
