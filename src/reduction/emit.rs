//! Reduced graph emission
//!
//! The last pass of every reduction: live states are renumbered densely from
//! 1 in the order of their origin ids, and every surviving edge is rewritten
//! through the state resolver and the renumbering. Writers only ever see the
//! resulting [`ReducedGraph`].

use crate::error::{Error, Result};
use crate::lts::StateId;
use crate::reduction::annotation::{Annotation, Annotations};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Label of an edge that survived a reduction
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum EdgeLabel {
    /// Rate expression of a Markovian delay
    Rate(String),
    /// Full label text of a timed delay
    Timed(String),
    /// Name of an interactive action
    Action(String),
}

impl EdgeLabel {
    pub fn is_stochastic(&self) -> bool {
        matches!(self, EdgeLabel::Rate(_) | EdgeLabel::Timed(_))
    }

    /// The label as it appears in an automaton file
    pub fn to_label_text(&self) -> String {
        match self {
            EdgeLabel::Rate(expr) => format!("rate {}", expr),
            EdgeLabel::Timed(text) | EdgeLabel::Action(text) => text.clone(),
        }
    }
}

impl fmt::Display for EdgeLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\"{}\"", self.to_label_text())
    }
}

/// An edge in origin ids, before renumbering
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SurvivingEdge {
    pub source: StateId,
    pub label: EdgeLabel,
    pub target: StateId,
}

impl SurvivingEdge {
    pub fn new(source: StateId, label: EdgeLabel, target: StateId) -> Self {
        Self {
            source,
            label,
            target,
        }
    }
}

/// A transition of the reduced graph; states are numbered from 1
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReducedTransition {
    pub source: u32,
    pub label: EdgeLabel,
    pub target: u32,
}

/// Final output of a reduction
#[derive(Debug, Clone, Serialize)]
pub struct ReducedGraph {
    /// Number of the initial state
    pub initial: u32,
    /// Number of states; states are `1..=state_count`
    pub state_count: u32,
    pub transitions: Vec<ReducedTransition>,
    /// Annotation of state `n` at index `n - 1`
    pub labels: Vec<Annotation>,
}

impl ReducedGraph {
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn label(&self, state: u32) -> Option<Annotation> {
        let idx = usize::try_from(state).ok()?.checked_sub(1)?;
        self.labels.get(idx).copied()
    }

    pub fn failed_states(&self) -> impl Iterator<Item = u32> + '_ {
        (1..=self.state_count).filter(|&s| self.label(s).is_some_and(Annotation::is_failed))
    }

    /// Whether any transition is not a Markovian delay
    pub fn has_non_rate_transitions(&self) -> bool {
        self.transitions
            .iter()
            .any(|t| !matches!(t.label, EdgeLabel::Rate(_)))
    }
}

/// Renumber `live` and rewrite `edges` into a [`ReducedGraph`].
///
/// Edges whose source is not live belong to redirected or merged states and
/// are skipped. A resolved target outside `live` is a [`Error::DanglingTarget`].
pub fn emit(
    initial: StateId,
    live: &BTreeSet<StateId>,
    edges: &[SurvivingEdge],
    resolve: impl Fn(StateId) -> StateId,
    annotations: &Annotations,
) -> Result<ReducedGraph> {
    let numbering: HashMap<StateId, u32> = live.iter().copied().zip(1u32..).collect();
    let number = |from: StateId, state: StateId| {
        numbering
            .get(&state)
            .copied()
            .ok_or(Error::DanglingTarget {
                from,
                target: state,
            })
    };

    let initial_state = resolve(initial);
    let initial_number = number(initial, initial_state)?;

    let mut transitions = Vec::with_capacity(edges.len());
    for edge in edges {
        let Some(&source) = numbering.get(&edge.source) else {
            continue;
        };
        transitions.push(ReducedTransition {
            source,
            label: edge.label.clone(),
            target: number(edge.source, resolve(edge.target))?,
        });
    }

    let labels = live.iter().map(|&s| annotations.resolved(s)).collect();

    tracing::debug!(
        "Emitted {} states and {} transitions",
        live.len(),
        transitions.len()
    );
    Ok(ReducedGraph {
        initial: initial_number,
        state_count: numbering.len() as u32,
        transitions,
        labels,
    })
}
