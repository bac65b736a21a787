use crate::lts::{AutomatonSource, RawEdge, StateId};
use petgraph::Direction;
use petgraph::prelude::EdgeRef;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use serde::Serialize;
use std::collections::HashMap;

/// An in-memory labeled transition system.
///
/// States keep the integer identity they have in the input file; edges carry
/// the raw label text. Classification of labels happens later, in the
/// reductions, so the automaton itself has no opinion about what a label means.
#[derive(Debug, Clone)]
pub struct Automaton {
    /// The underlying graph structure.
    /// Node weights are the state identifiers, edge weights the labels.
    pub graph: StableGraph<StateId, String>,

    /// A lookup table mapping state identifiers to their internal graph indices.
    ///
    /// Edges are added by state identifier, so every insertion goes through
    /// this index. It also guarantees each state is represented by exactly
    /// one node.
    pub state_index: HashMap<StateId, NodeIndex>,

    /// The state exploration starts from.
    pub initial: StateId,

    /// State count announced by the input. Declared states nobody touches
    /// get no node.
    pub declared_states: usize,
}

impl Automaton {
    pub fn new(initial: StateId) -> Self {
        let mut automaton = Self {
            graph: StableGraph::new(),
            state_index: HashMap::new(),
            initial,
            declared_states: 0,
        };
        automaton.add_state(initial);
        automaton
    }

    /// Create an automaton declaring states `0..state_count`. Nodes are
    /// only allocated once a state is added.
    pub fn with_declared_states(initial: StateId, state_count: StateId) -> Self {
        let mut automaton = Self::new(initial);
        automaton.declared_states = state_count as usize;
        automaton
    }

    /// Build an automaton from an edge list, adding states as they appear.
    pub fn from_edges<'a>(
        initial: StateId,
        edges: impl IntoIterator<Item = (StateId, &'a str, StateId)>,
    ) -> Self {
        let mut automaton = Self::new(initial);
        for (source, label, target) in edges {
            automaton.add_state(source);
            automaton.add_state(target);
            automaton.add_edge(source, label, target);
        }
        automaton
    }

    /// Adds a state to the graph unless it is already present.
    pub fn add_state(&mut self, state: StateId) -> NodeIndex {
        if let Some(&idx) = self.state_index.get(&state) {
            return idx;
        }
        let idx = self.graph.add_node(state);
        self.state_index.insert(state, idx);
        idx
    }

    /// Adds an edge between two existing states.
    pub fn add_edge(
        &mut self,
        source: StateId,
        label: impl Into<String>,
        target: StateId,
    ) -> Option<EdgeIndex> {
        let (&from_idx, &to_idx) = (
            self.state_index.get(&source)?,
            self.state_index.get(&target)?,
        );
        Some(self.graph.add_edge(from_idx, to_idx, label.into()))
    }

    /// Outgoing edges of a state, in insertion order.
    pub fn outgoing(&self, state: StateId) -> Vec<RawEdge> {
        let Some(&idx) = self.state_index.get(&state) else {
            return Vec::new();
        };
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .collect();
        edges.sort_by_key(|edge| edge.id());
        edges
            .into_iter()
            .map(|edge| RawEdge::new(state, edge.weight().as_str(), self.graph[edge.target()]))
            .collect()
    }

    /// All edges, in insertion order.
    pub fn edges(&self) -> Vec<RawEdge> {
        self.graph
            .edge_indices()
            .filter_map(|idx| {
                let (from, to) = self.graph.edge_endpoints(idx)?;
                Some(RawEdge::new(
                    self.graph[from],
                    self.graph[idx].as_str(),
                    self.graph[to],
                ))
            })
            .collect()
    }

    /// Allocated states without outgoing edges
    pub fn deadlock_states(&self) -> Vec<StateId> {
        let mut states: Vec<StateId> = self
            .graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .edges_directed(idx, Direction::Outgoing)
                    .next()
                    .is_none()
            })
            .map(|idx| self.graph[idx])
            .collect();
        states.sort_unstable();
        states
    }

    fn unallocated_states(&self) -> usize {
        self.declared_states.saturating_sub(self.graph.node_count())
    }

    /// Get graph statistics
    pub fn stats(&self) -> AutomatonStats {
        AutomatonStats {
            total_states: self.state_count(),
            total_edges: self.graph.edge_count(),
            deadlock_states: self.deadlock_states().len() + self.unallocated_states(),
            initial_state: self.initial,
        }
    }
}

impl AutomatonSource for Automaton {
    fn initial_state(&self) -> StateId {
        self.initial
    }

    fn state_count(&self) -> usize {
        self.graph.node_count().max(self.declared_states)
    }

    fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn for_each_outgoing(&self, state: StateId, visit: &mut dyn FnMut(&str, StateId)) {
        for edge in self.outgoing(state) {
            visit(&edge.label, edge.target);
        }
    }
}

/// Shape of an automaton as read
#[derive(Debug, Clone, Serialize)]
pub struct AutomatonStats {
    pub total_states: usize,
    pub total_edges: usize,
    pub deadlock_states: usize,
    pub initial_state: StateId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_automaton() {
        let automaton = Automaton::new(0);
        assert_eq!(automaton.state_count(), 1);
        assert_eq!(automaton.edge_count(), 0);
        assert_eq!(automaton.deadlock_states(), vec![0]);
    }

    #[test]
    fn test_outgoing_keeps_insertion_order() {
        let automaton = Automaton::from_edges(
            0,
            [(0, "rate 1", 1), (0, "rate 2", 2), (0, "FAIL", 1), (1, "i", 2)],
        );

        let labels: Vec<String> = automaton.outgoing(0).into_iter().map(|e| e.label).collect();
        assert_eq!(labels, vec!["rate 1", "rate 2", "FAIL"]);

        let mut visited = Vec::new();
        automaton.for_each_outgoing(1, &mut |label, target| {
            visited.push((label.to_string(), target))
        });
        assert_eq!(visited, vec![("i".to_string(), 2)]);
    }

    #[test]
    fn test_add_edge_requires_known_states() {
        let mut automaton = Automaton::new(0);
        automaton.add_state(1);
        assert!(automaton.add_edge(0, "rate 1", 1).is_some());
        assert!(automaton.add_edge(0, "rate 1", 7).is_none());
        assert_eq!(automaton.edge_count(), 1);
    }

    #[test]
    fn test_unknown_state_has_no_edges() {
        let automaton = Automaton::with_declared_states(0, 2);
        assert!(automaton.outgoing(42).is_empty());
        assert!(automaton.outgoing(1).is_empty());
    }

    #[test]
    fn test_declared_states_are_not_allocated() {
        let automaton = Automaton::with_declared_states(0, StateId::MAX);
        assert_eq!(automaton.graph.node_count(), 1);
        assert_eq!(automaton.state_count(), StateId::MAX as usize);

        let stats = Automaton::with_declared_states(0, 4).stats();
        assert_eq!(stats.total_states, 4);
        assert_eq!(stats.deadlock_states, 4);
    }

    #[test]
    fn test_stats() {
        let automaton = Automaton::from_edges(0, [(0, "rate 1", 1), (1, "rate 2", 2)]);
        let stats = automaton.stats();
        assert_eq!(stats.total_states, 3);
        assert_eq!(stats.total_edges, 2);
        assert_eq!(stats.deadlock_states, 1);
        assert_eq!(stats.initial_state, 0);
        assert_eq!(automaton.edges()[1], RawEdge::new(1, "rate 2", 2));
    }
}
