//! Reduction module - maximal progress, redirect collapsing and label propagation
//!
//! Two pipelines share the passes in this module:
//!
//! - [`reduce`]: explore, collapse redirect chains, propagate annotations,
//!   optionally merge identical states, emit. Interactive edges disappear and
//!   only delays remain.
//! - [`maximal_progress`]: the direct-graph variant that keeps interactive
//!   edges and only removes the delays they preempt.

use crate::Result;
use crate::config::Config;
use crate::lts::{AutomatonSource, StateId};
use serde::Serialize;
use std::fmt;

pub mod annotation;
pub mod emit;
pub mod explorer;
pub mod label;
pub mod maxprog;
pub mod redirect;
pub mod store;

// Re-export key types
pub use annotation::{Annotation, Annotations};
pub use emit::{EdgeLabel, ReducedGraph, ReducedTransition, SurvivingEdge};
pub use label::{Action, LabelClass, LabelClassifier};
pub use redirect::RedirectMap;
pub use store::StateStore;

/// A non-fatal finding; processing continues
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Warning {
    /// An interactive action with no known effect
    UnknownLabel { state: StateId, label: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Warning::UnknownLabel { state, label } => write!(
                f,
                "unknown transition label \"{}\" in state {}, assuming no special effect",
                label, state
            ),
        }
    }
}

/// Settings shared by both pipelines
#[derive(Debug, Clone, Default)]
pub struct ReductionOptions {
    pub classifier: LabelClassifier,
    pub merge_identical: bool,
}

impl ReductionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            classifier: LabelClassifier::from_config(&config.labels),
            merge_identical: config.reduction.merge_identical,
        }
    }
}

/// Counters describing one run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReductionStats {
    pub input_states: usize,
    pub input_edges: usize,
    pub reachable_states: usize,
    pub redirected_states: usize,
    pub merged_states: usize,
    pub preempted_delays: usize,
    pub unknown_annotations: usize,
    pub output_states: usize,
    pub output_transitions: usize,
    pub failed_states: usize,
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct Reduction {
    pub graph: ReducedGraph,
    pub stats: ReductionStats,
    pub warnings: Vec<Warning>,
}

impl Reduction {
    fn new(graph: ReducedGraph, mut stats: ReductionStats, warnings: Vec<Warning>) -> Self {
        stats.output_states = graph.state_count as usize;
        stats.output_transitions = graph.transition_count();
        stats.failed_states = graph.failed_states().count();
        Self {
            graph,
            stats,
            warnings,
        }
    }
}

/// Reduce `source` to a graph of delays with failure labels
pub fn reduce<S: AutomatonSource + ?Sized>(
    source: &S,
    options: &ReductionOptions,
) -> Result<Reduction> {
    let initial = source.initial_state();
    tracing::info!(
        "Reducing automaton with {} states and {} edges",
        source.state_count(),
        source.edge_count()
    );

    let mut exploration = explorer::explore(source, &options.classifier)?;
    exploration
        .redirects
        .collapse(initial, &mut exploration.annotations)?;

    let live = exploration.live_states();
    let redirects = &exploration.redirects;
    let unknown_annotations =
        exploration
            .annotations
            .propagate(&live, &exploration.edges, |s| redirects.resolve(s))?;

    let merge = options.merge_identical.then(|| {
        store::merge_identical(
            &live,
            &exploration.edges,
            |s| redirects.resolve(s),
            &exploration.annotations,
        )
    });
    let resolve = |s| {
        let target = redirects.resolve(s);
        merge.as_ref().map_or(target, |m| m.representative(target))
    };
    let emitted_live = merge.as_ref().map_or(&live, |m| &m.live);

    let graph = emit::emit(
        initial,
        emitted_live,
        &exploration.edges,
        resolve,
        &exploration.annotations,
    )?;

    let stats = ReductionStats {
        input_states: source.state_count(),
        input_edges: source.edge_count(),
        reachable_states: exploration.visited.len(),
        redirected_states: redirects.len(),
        merged_states: merge.as_ref().map_or(0, |m| m.merged_count()),
        preempted_delays: exploration.preempted,
        unknown_annotations,
        ..Default::default()
    };
    Ok(Reduction::new(graph, stats, exploration.warnings))
}

/// Remove preempted delays while keeping states and interactive edges
pub fn maximal_progress<S: AutomatonSource + ?Sized>(
    source: &S,
    options: &ReductionOptions,
) -> Result<Reduction> {
    tracing::info!(
        "Applying maximal progress to automaton with {} states and {} edges",
        source.state_count(),
        source.edge_count()
    );

    let result = maxprog::maximal_progress(source, &options.classifier)?;
    let graph = emit::emit(
        source.initial_state(),
        &result.visited,
        &result.edges,
        |s| s,
        &Annotations::new(),
    )?;

    let stats = ReductionStats {
        input_states: source.state_count(),
        input_edges: source.edge_count(),
        reachable_states: result.visited.len(),
        preempted_delays: result.preempted,
        ..Default::default()
    };
    Ok(Reduction::new(graph, stats, result.warnings))
}
