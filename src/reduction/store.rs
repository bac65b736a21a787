//! Hash-consing state store
//!
//! States are kept in a dense arena indexed by [`StoreId`]; a side hash map
//! from the canonical encoding of a state to its index makes interning a
//! lookup. Two states are the same entry iff their keys are equal, which is
//! structural equality over their outgoing transitions.

use crate::lts::StateId;
use crate::reduction::annotation::{Annotation, Annotations};
use crate::reduction::emit::{EdgeLabel, SurvivingEdge};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Index of a state in the store
pub type StoreId = u32;

/// Outgoing `(label, target)` pairs with their multiplicity. Parallel delays
/// add up, so two copies of an edge are not the same as one.
pub type TransitionCounts = BTreeMap<(EdgeLabel, StoreId), usize>;

/// Canonical encoding of a state
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateKey {
    pub annotation: Annotation,
    pub transitions: TransitionCounts,
}

impl StateKey {
    pub fn new(
        annotation: Annotation,
        transitions: impl IntoIterator<Item = (EdgeLabel, StoreId)>,
    ) -> Self {
        let mut counts = TransitionCounts::new();
        for transition in transitions {
            *counts.entry(transition).or_default() += 1;
        }
        Self {
            annotation,
            transitions: counts,
        }
    }
}

/// A state as stored in the arena
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredState {
    /// The first origin state interned with this key
    pub origin: StateId,
}

#[derive(Debug, Default)]
pub struct StateStore {
    states: Vec<StoredState>,
    index: HashMap<StateKey, StoreId>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id of the state structurally equal to `key`, allocating a
    /// new one for `origin` if there is none.
    pub fn intern(&mut self, origin: StateId, key: &StateKey) -> (StoreId, bool) {
        if let Some(&id) = self.index.get(key) {
            return (id, false);
        }
        let id = self.states.len() as StoreId;
        self.states.push(StoredState { origin });
        self.index.insert(key.clone(), id);
        (id, true)
    }

    pub fn get(&self, id: StoreId) -> Option<&StoredState> {
        self.states.get(id as usize)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Result of merging structurally identical live states
#[derive(Debug, Clone)]
pub struct Merge {
    /// One representative origin state per store entry
    pub live: BTreeSet<StateId>,
    representative: HashMap<StateId, StateId>,
}

impl Merge {
    /// Representative of a live state; other states map to themselves
    pub fn representative(&self, state: StateId) -> StateId {
        self.representative.get(&state).copied().unwrap_or(state)
    }

    pub fn merged_count(&self) -> usize {
        self.representative.len() - self.live.len()
    }
}

/// Intern every live state by its final annotation and its outgoing edges
/// over canonical ids.
///
/// Each round interns all states into a fresh store, keyed on the store ids
/// the previous round gave their targets; the first round uses one id per
/// state. Rounds only ever join classes, so the pass stops at the first
/// round that keeps the class count. Targets outside `live` are left out of
/// the key; emission rejects them anyway.
///
/// States are interned in ascending origin order, so the representative of a
/// group is its smallest member and the relative order of representatives
/// matches the origin order.
pub fn merge_identical(
    live: &BTreeSet<StateId>,
    edges: &[SurvivingEdge],
    resolve: impl Fn(StateId) -> StateId,
    annotations: &Annotations,
) -> Merge {
    let mut outgoing: BTreeMap<StateId, Vec<(&EdgeLabel, StateId)>> = BTreeMap::new();
    for edge in edges.iter().filter(|e| live.contains(&e.source)) {
        outgoing
            .entry(edge.source)
            .or_default()
            .push((&edge.label, resolve(edge.target)));
    }

    let mut canonical: HashMap<StateId, StoreId> = live.iter().copied().zip(0..).collect();
    let mut classes = live.len();
    let mut rounds = 0;
    let store = loop {
        rounds += 1;
        let mut store = StateStore::new();
        let mut next: HashMap<StateId, StoreId> = HashMap::with_capacity(live.len());
        for &state in live {
            let transitions = outgoing
                .get(&state)
                .into_iter()
                .flatten()
                .filter_map(|&(label, target)| Some((label.clone(), *canonical.get(&target)?)));
            let key = StateKey::new(annotations.resolved(state), transitions);
            let (id, _) = store.intern(state, &key);
            next.insert(state, id);
        }

        let stable = store.len() == classes;
        classes = store.len();
        canonical = next;
        if stable {
            break store;
        }
    };

    let representative: HashMap<StateId, StateId> = canonical
        .iter()
        .filter_map(|(&state, &id)| Some((state, store.get(id)?.origin)))
        .collect();
    let merged_live: BTreeSet<StateId> = representative.values().copied().collect();

    tracing::debug!(
        "Merged {} live states into {} distinct states in {} rounds",
        live.len(),
        store.len(),
        rounds
    );
    Merge {
        live: merged_live,
        representative,
    }
}
