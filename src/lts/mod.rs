//! Labeled transition systems - the automaton representation the reductions read

pub mod graph;
pub mod transition;

// Re-export key types
pub use graph::{Automaton, AutomatonStats};
pub use transition::RawEdge;

/// Identifier of a state in a source automaton
pub type StateId = u32;

/// Read-only access to an automaton
///
/// Implementations enumerate the outgoing edges of a state in their own
/// order. The reductions never mutate a source and only ask for the edges
/// of states they reach.
pub trait AutomatonSource {
    /// The state exploration starts from
    fn initial_state(&self) -> StateId;

    /// Number of states declared by the source
    fn state_count(&self) -> usize;

    /// Number of edges declared by the source
    fn edge_count(&self) -> usize;

    /// Visit every outgoing edge of `state` as `(label, target)`
    fn for_each_outgoing(&self, state: StateId, visit: &mut dyn FnMut(&str, StateId));
}

impl<T: AutomatonSource + ?Sized> AutomatonSource for &T {
    fn initial_state(&self) -> StateId {
        (**self).initial_state()
    }

    fn state_count(&self) -> usize {
        (**self).state_count()
    }

    fn edge_count(&self) -> usize {
        (**self).edge_count()
    }

    fn for_each_outgoing(&self, state: StateId, visit: &mut dyn FnMut(&str, StateId)) {
        (**self).for_each_outgoing(state, visit)
    }
}
