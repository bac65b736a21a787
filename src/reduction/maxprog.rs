//! Maximal progress on the direct graph
//!
//! Unlike [`explore`](crate::reduction::explorer::explore), nothing is
//! redirected here: states keep their identity and interactive edges are
//! emitted. A state with an immediate edge loses its Markovian delays. Its
//! timed delays survive only when the state is timed-reachable, i.e. it is
//! entered by a timed delay, or by a chain of immediate edges starting at
//! such a state, so the timed delay belongs to the same instant.
//!
//! Silent edges are followed for reachability but never emitted. A state
//! whose only remaining behaviour is a silent step is therefore written
//! without outgoing edges, and the states behind it lose that incoming edge.
//! Such states are counted in [`MaxProgress::silent_only`] and reported; the
//! full reduction collapses silent steps instead.

use crate::error::Result;
use crate::lts::{AutomatonSource, StateId};
use crate::reduction::Warning;
use crate::reduction::emit::{EdgeLabel, SurvivingEdge};
use crate::reduction::explorer::classified_edges;
use crate::reduction::label::{LabelClass, LabelClassifier};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

/// Result of the direct-graph traversal
#[derive(Debug, Default)]
pub struct MaxProgress {
    pub visited: BTreeSet<StateId>,
    pub timed_reachable: BTreeSet<StateId>,
    /// Kept edges of every visited state, in state order
    pub edges: Vec<SurvivingEdge>,
    pub warnings: Vec<Warning>,
    /// Delays dropped by maximal progress
    pub preempted: usize,
    /// States left without edges because all they do is a silent step
    pub silent_only: BTreeSet<StateId>,
}

#[derive(Debug, Clone, Copy)]
enum Step {
    /// Immediate edge: same instant as its source
    Immediate,
    /// Markovian delay
    Delay,
    /// Timed delay
    Timed,
}

/// Apply maximal progress to every state reachable from the initial state
pub fn maximal_progress<S: AutomatonSource + ?Sized>(
    source: &S,
    classifier: &LabelClassifier,
) -> Result<MaxProgress> {
    let mut result = MaxProgress::default();
    // State -> timed-reachable flag it was last explored with.
    let mut explored: HashMap<StateId, bool> = HashMap::new();
    let mut kept: BTreeMap<StateId, (Vec<SurvivingEdge>, usize)> = BTreeMap::new();
    let mut worklist = VecDeque::new();

    let initial = source.initial_state();
    result.visited.insert(initial);
    worklist.push_back(initial);

    while let Some(state) = worklist.pop_front() {
        let timed = result.timed_reachable.contains(&state);
        let first_visit = match explored.insert(state, timed) {
            Some(previous) if previous == timed => continue,
            Some(_) => false,
            None => true,
        };

        let edges = classified_edges(source, classifier, state);
        let urgent = edges.iter().any(|e| e.class.is_immediate());

        let mut state_edges = Vec::new();
        let mut dropped = 0;
        let mut successors = Vec::new();
        for edge in &edges {
            let step = match &edge.class {
                LabelClass::Silent => Step::Immediate,
                LabelClass::Interactive(_) => {
                    if first_visit && edge.class.is_unknown() {
                        result.warnings.push(Warning::UnknownLabel {
                            state,
                            label: edge.label.clone(),
                        });
                    }
                    Step::Immediate
                }
                LabelClass::Rate(_) if urgent => {
                    dropped += 1;
                    continue;
                }
                LabelClass::Rate(_) => Step::Delay,
                LabelClass::Timed if urgent && !timed => {
                    dropped += 1;
                    continue;
                }
                LabelClass::Timed => Step::Timed,
            };
            if let Some(label) = edge.surviving_label() {
                state_edges.push(SurvivingEdge::new(state, label, edge.target));
            }
            successors.push((edge.target, step));
        }
        if state_edges.is_empty() && edges.iter().any(|e| e.class == LabelClass::Silent) {
            result.silent_only.insert(state);
        }
        kept.insert(state, (state_edges, dropped));

        for (target, step) in successors {
            let flagged = match step {
                Step::Timed => true,
                Step::Immediate => timed,
                Step::Delay => false,
            };
            let newly_flagged = flagged && result.timed_reachable.insert(target);
            if result.visited.insert(target) || newly_flagged {
                worklist.push_back(target);
            }
        }
    }

    for (_, (edges, dropped)) in kept {
        result.edges.extend(edges);
        result.preempted += dropped;
    }

    if !result.silent_only.is_empty() {
        tracing::warn!(
            "{} states only take silent steps and are written without outgoing edges",
            result.silent_only.len()
        );
    }

    tracing::debug!(
        "Maximal progress kept {} edges of {} states, preempted {} delays ({} timed-reachable states)",
        result.edges.len(),
        result.visited.len(),
        result.preempted,
        result.timed_reachable.len()
    );
    Ok(result)
}

impl MaxProgress {
    /// Labels of the kept edges leaving `state`
    pub fn labels_from(&self, state: StateId) -> Vec<&EdgeLabel> {
        self.edges
            .iter()
            .filter(|e| e.source == state)
            .map(|e| &e.label)
            .collect()
    }
}
