//! Redirects and chain collapsing
//!
//! A redirect `s -> t` records that state `s` has no behaviour of its own: it
//! immediately becomes `t`. Chains `a -> b -> c` are collapsed so every
//! source points at a state that is not itself redirected.

use crate::error::{Error, Result};
use crate::lts::StateId;
use crate::reduction::annotation::Annotations;
use std::collections::{BTreeMap, HashSet};

/// A single redirect entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub target: StateId,
    /// Label of the immediate edge that caused the redirect
    pub label: String,
}

/// Partial map from redirected states to their targets
#[derive(Debug, Clone, Default)]
pub struct RedirectMap {
    entries: BTreeMap<StateId, Redirect>,
}

impl RedirectMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: StateId, target: StateId, label: impl Into<String>) {
        self.entries.insert(
            source,
            Redirect {
                target,
                label: label.into(),
            },
        );
    }

    pub fn get(&self, source: StateId) -> Option<&Redirect> {
        self.entries.get(&source)
    }

    pub fn contains(&self, state: StateId) -> bool {
        self.entries.contains_key(&state)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sources(&self) -> impl Iterator<Item = StateId> + '_ {
        self.entries.keys().copied()
    }

    /// One step through the map; unredirected states map to themselves
    pub fn resolve(&self, state: StateId) -> StateId {
        self.entries.get(&state).map_or(state, |r| r.target)
    }

    /// Whether every target is a state that is not redirected itself
    pub fn is_collapsed(&self) -> bool {
        self.entries.values().all(|r| !self.contains(r.target))
    }

    /// Rewrite every chain to point at its final target.
    ///
    /// Walking the chain `a -> b -> c`, the pending annotation of each
    /// intermediate state `b` is merged into `c`; two different known
    /// annotations are a conflict. A chain that returns to a state already on
    /// it has no stable target. `initial` only decides which error reports
    /// such a loop.
    pub fn collapse(&mut self, initial: StateId, annotations: &mut Annotations) -> Result<()> {
        let sources: Vec<StateId> = self.sources().collect();
        let mut rewrites = 0usize;

        for start in sources {
            let mut path = vec![start];
            let mut on_path: HashSet<StateId> = HashSet::from([start]);
            let mut current = self.resolve(start);

            while let Some(next) = self.get(current).map(|r| r.target) {
                if !on_path.insert(current) {
                    return Err(self.cycle_error(initial, current));
                }
                path.push(current);
                current = next;
            }
            if on_path.contains(&current) {
                return Err(self.cycle_error(initial, current));
            }

            // `path[0]` is the start; its annotation was written by whoever
            // redirected into it, and it moves to the final target too.
            for &via in &path {
                if let Some(annotation) = annotations.get(via) {
                    annotations.assign(current, annotation, || {
                        format!("redirect chain through {} state {}", annotation, via)
                    })?;
                }
            }

            for &via in &path {
                if let Some(entry) = self.entries.get_mut(&via)
                    && entry.target != current
                {
                    entry.target = current;
                    rewrites += 1;
                }
            }
        }

        tracing::debug!(
            "Collapsed {} redirects with {} chain rewrites",
            self.len(),
            rewrites
        );
        Ok(())
    }

    fn cycle_error(&self, initial: StateId, state: StateId) -> Error {
        let mut current = initial;
        let mut seen = HashSet::new();
        while let Some(redirect) = self.get(current) {
            if !seen.insert(current) {
                return Error::InitialRedirect { state: initial };
            }
            current = redirect.target;
        }
        Error::RedirectCycle { state }
    }
}
