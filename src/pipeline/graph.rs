//! The review graph: stage identifiers wired into a DAG with one
//! conditional edge.
//!
//! The shape is plain data and can be inspected without running any task:
//!
//! ```text
//! initialize -> syntax_analysis -> security_performance -> architecture_testing
//!     architecture_testing --(documentation wanted)--> documentation_analysis -> generate_report
//!     architecture_testing --(skip documentation)----> generate_report
//! ```

use super::stage::{
    FinalizeStage, InitializeStage, ParallelPairStage, Stage, StageId, StageKind, TaskStage,
};
use super::state::PipelineState;
use crate::core::TaskLabel;
use crate::errors::{PipelineError, Result};
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

/// Edge label in the stage graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Always,
    /// Taken when the branch predicate holds
    IfTrue,
    IfFalse,
}

/// Predicate evaluated at the single branch point.
pub type BranchPredicate = fn(&PipelineState) -> bool;

#[derive(Clone, Copy)]
struct Branch {
    from: StageId,
    predicate: BranchPredicate,
}

/// Whether the documentation stage should run.
pub fn wants_documentation(state: &PipelineState) -> bool {
    !state.flags().skip_documentation
}

/// Validated pipeline graph.
pub struct PipelineGraph {
    graph: DiGraph<StageId, Transition>,
    nodes: HashMap<StageId, NodeIndex>,
    stages: HashMap<StageId, Box<dyn Stage>>,
    entry: StageId,
    branch: Option<Branch>,
}

impl PipelineGraph {
    pub fn builder() -> PipelineGraphBuilder {
        PipelineGraphBuilder::default()
    }

    /// The six-stage review graph.
    pub fn standard() -> Result<Self> {
        use StageId::*;

        Self::builder()
            .stage(InitializeStage)
            .stage(TaskStage::new(
                SyntaxAnalysis,
                "Syntax & logic analysis",
                TaskLabel::SyntaxLogic,
            ))
            .stage(ParallelPairStage::new(
                SecurityPerformance,
                "Security + performance analysis",
                [TaskLabel::Security, TaskLabel::Performance],
            ))
            .stage(ParallelPairStage::new(
                ArchitectureTesting,
                "Architecture + testing analysis",
                [TaskLabel::Architecture, TaskLabel::Testing],
            ))
            .stage(TaskStage::new(
                DocumentationAnalysis,
                "Documentation analysis",
                TaskLabel::Documentation,
            ))
            .stage(FinalizeStage)
            .entry(Initialize)
            .edge(Initialize, SyntaxAnalysis)
            .edge(SyntaxAnalysis, SecurityPerformance)
            .edge(SecurityPerformance, ArchitectureTesting)
            .branch(
                ArchitectureTesting,
                wants_documentation,
                DocumentationAnalysis,
                GenerateReport,
            )
            .edge(DocumentationAnalysis, GenerateReport)
            .build()
    }

    pub fn entry(&self) -> StageId {
        self.entry
    }

    pub fn stage(&self, id: StageId) -> Option<&dyn Stage> {
        self.stages.get(&id).map(|s| s.as_ref())
    }

    /// Number of registered stages, including ones a run may skip.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// The stage that owns the conditional edge.
    pub fn branch_point(&self) -> Option<StageId> {
        self.branch.map(|b| b.from)
    }

    /// Outgoing edges of `id`, sorted by target.
    pub fn successors(&self, id: StageId) -> Vec<(StageId, Transition)> {
        let Some(&node) = self.nodes.get(&id) else {
            return Vec::new();
        };
        let mut out: Vec<_> = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .map(|edge| (self.graph[edge.target()], *edge.weight()))
            .collect();
        out.sort_by_key(|(target, _)| *target);
        out
    }

    /// Stage to run after `id`, or `None` when `id` is terminal.
    pub fn next(&self, id: StageId, state: &PipelineState) -> Option<StageId> {
        let wanted = match self.branch {
            Some(branch) if branch.from == id => {
                if (branch.predicate)(state) {
                    Transition::IfTrue
                } else {
                    Transition::IfFalse
                }
            }
            _ => Transition::Always,
        };
        self.successors(id)
            .into_iter()
            .find(|(_, transition)| *transition == wanted)
            .map(|(target, _)| target)
    }
}

/// Collects stages and edges, then validates the shape in [`build`].
///
/// [`build`]: PipelineGraphBuilder::build
#[derive(Default)]
pub struct PipelineGraphBuilder {
    stages: Vec<Box<dyn Stage>>,
    edges: Vec<(StageId, StageId, Transition)>,
    entry: Option<StageId>,
    branches: Vec<Branch>,
}

impl PipelineGraphBuilder {
    pub fn stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn entry(mut self, id: StageId) -> Self {
        self.entry = Some(id);
        self
    }

    pub fn edge(mut self, from: StageId, to: StageId) -> Self {
        self.edges.push((from, to, Transition::Always));
        self
    }

    /// Conditional edge: `if_true` when `predicate` holds, else `if_false`.
    pub fn branch(
        mut self,
        from: StageId,
        predicate: BranchPredicate,
        if_true: StageId,
        if_false: StageId,
    ) -> Self {
        self.branches.push(Branch { from, predicate });
        self.edges.push((from, if_true, Transition::IfTrue));
        self.edges.push((from, if_false, Transition::IfFalse));
        self
    }

    pub fn build(self) -> Result<PipelineGraph> {
        let mut graph = DiGraph::new();
        let mut nodes = HashMap::new();
        let mut stages = HashMap::new();

        for stage in self.stages {
            let id = stage.id();
            if stages.contains_key(&id) {
                return Err(PipelineError::invalid_graph(format!(
                    "stage '{id}' registered twice"
                )));
            }
            if stage.kind() == StageKind::ParallelPair && stage.tasks().len() != 2 {
                return Err(PipelineError::invalid_graph(format!(
                    "parallel stage '{id}' must run exactly two tasks"
                )));
            }
            nodes.insert(id, graph.add_node(id));
            stages.insert(id, stage);
        }

        let entry = self
            .entry
            .ok_or_else(|| PipelineError::invalid_graph("no entry stage"))?;
        if !nodes.contains_key(&entry) {
            return Err(PipelineError::invalid_graph(format!(
                "entry stage '{entry}' is not registered"
            )));
        }

        for (from, to, transition) in self.edges {
            let (Some(&a), Some(&b)) = (nodes.get(&from), nodes.get(&to)) else {
                return Err(PipelineError::invalid_graph(format!(
                    "edge {from} -> {to} references an unregistered stage"
                )));
            };
            graph.add_edge(a, b, transition);
        }

        if self.branches.len() > 1 {
            return Err(PipelineError::invalid_graph(
                "more than one conditional edge",
            ));
        }
        let branch = self.branches.first().copied();

        for (&id, &node) in &nodes {
            let outgoing: Vec<Transition> = graph
                .edges_directed(node, Direction::Outgoing)
                .map(|e| *e.weight())
                .collect();
            let is_branch = branch.is_some_and(|b| b.from == id);
            let valid = if is_branch {
                outgoing.len() == 2 && !outgoing.contains(&Transition::Always)
            } else {
                outgoing.len() <= 1
            };
            if !valid {
                return Err(PipelineError::invalid_graph(format!(
                    "stage '{id}' has an ambiguous successor"
                )));
            }
        }

        if is_cyclic_directed(&graph) {
            return Err(PipelineError::invalid_graph("stage graph contains a cycle"));
        }

        Ok(PipelineGraph {
            graph,
            nodes,
            stages,
            entry,
            branch,
        })
    }
}
