//! Failure classification of states and its propagation

use crate::error::{Error, Result};
use crate::lts::StateId;
use crate::reduction::emit::SurvivingEdge;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use std::fmt;

/// Classification of a state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Annotation {
    Failed,
    Operational,
}

impl Annotation {
    pub fn is_failed(self) -> bool {
        self == Annotation::Failed
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Annotation::Failed => write!(f, "failed"),
            Annotation::Operational => write!(f, "not failed"),
        }
    }
}

/// Known annotations per state; absent states are unknown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    known: BTreeMap<StateId, Annotation>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, state: StateId) -> Option<Annotation> {
        self.known.get(&state).copied()
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    /// Record `annotation` for `state`.
    ///
    /// Returns whether the state was previously unknown. Writing a different
    /// annotation over a known one is a conflict; `cause` describes the step
    /// that attempted it.
    pub fn assign(
        &mut self,
        state: StateId,
        annotation: Annotation,
        cause: impl FnOnce() -> String,
    ) -> Result<bool> {
        match self.known.get(&state) {
            Some(&existing) if existing == annotation => Ok(false),
            Some(&existing) => Err(Error::ConflictingAnnotation {
                state,
                existing,
                incoming: annotation,
                cause: cause(),
            }),
            None => {
                self.known.insert(state, annotation);
                Ok(true)
            }
        }
    }

    /// Propagate known annotations along surviving stochastic edges.
    ///
    /// Worklist fixed point over `live`: every state with a known annotation
    /// pushes it to the resolved targets of its edges. States annotated
    /// before the pass were entered by a failure or repair action and keep
    /// their annotation; two different values pushed into any other state
    /// are a conflict. A state is marked propagated once its own annotation
    /// has been pushed, so each state is processed at most once. Returns the
    /// number of states whose annotation was still unknown at the fixed point.
    pub fn propagate(
        &mut self,
        live: &BTreeSet<StateId>,
        edges: &[SurvivingEdge],
        resolve: impl Fn(StateId) -> StateId,
    ) -> Result<usize> {
        let mut successors: BTreeMap<StateId, Vec<&SurvivingEdge>> = BTreeMap::new();
        for edge in edges.iter().filter(|e| e.label.is_stochastic()) {
            if live.contains(&edge.source) {
                successors.entry(edge.source).or_default().push(edge);
            }
        }

        let mut worklist: VecDeque<StateId> = live
            .iter()
            .copied()
            .filter(|s| self.known.contains_key(s))
            .collect();
        let explicit: HashSet<StateId> = self.known.keys().copied().collect();
        let mut propagated: HashSet<StateId> = HashSet::new();

        while let Some(state) = worklist.pop_front() {
            if !propagated.insert(state) {
                continue;
            }
            let Some(annotation) = self.get(state) else {
                continue;
            };
            for edge in successors.get(&state).into_iter().flatten() {
                let target = resolve(edge.target);
                if explicit.contains(&target) {
                    continue;
                }
                let newly_known = self.assign(target, annotation, || {
                    format!("{} edge from {} state {}", edge.label, annotation, state)
                })?;
                if newly_known && !propagated.contains(&target) {
                    worklist.push_back(target);
                }
            }
        }

        let unknown = live.iter().filter(|s| !self.known.contains_key(s)).count();
        tracing::debug!(
            "Annotation propagation reached a fixed point: {} known, {} unknown",
            live.len() - unknown,
            unknown
        );
        Ok(unknown)
    }

    /// Final annotation of a state; unknown states count as operational
    pub fn resolved(&self, state: StateId) -> Annotation {
        self.get(state).unwrap_or(Annotation::Operational)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reduction::emit::EdgeLabel;

    fn rate(source: StateId, target: StateId) -> SurvivingEdge {
        SurvivingEdge::new(source, EdgeLabel::Rate("1".to_string()), target)
    }

    #[test]
    fn test_assign() {
        let mut annotations = Annotations::new();
        assert!(annotations.assign(1, Annotation::Failed, String::new).unwrap());
        assert!(!annotations.assign(1, Annotation::Failed, String::new).unwrap());

        let err = annotations
            .assign(1, Annotation::Operational, || "repair".to_string())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ConflictingAnnotation {
                state: 1,
                existing: Annotation::Failed,
                incoming: Annotation::Operational,
                ..
            }
        ));
    }

    #[test]
    fn test_propagates_along_chain_and_cycle() {
        let live: BTreeSet<StateId> = [0, 1, 2, 3].into();
        let edges = vec![rate(0, 1), rate(1, 2), rate(2, 1), rate(3, 0)];
        let mut annotations = Annotations::new();
        annotations.assign(1, Annotation::Failed, String::new).unwrap();

        let unknown = annotations.propagate(&live, &edges, |s| s).unwrap();

        assert_eq!(unknown, 2);
        assert_eq!(annotations.get(2), Some(Annotation::Failed));
        assert_eq!(annotations.get(0), None);
        assert_eq!(annotations.resolved(0), Annotation::Operational);
        assert_eq!(annotations.resolved(3), Annotation::Operational);
    }

    #[test]
    fn test_propagation_uses_resolved_targets() {
        let live: BTreeSet<StateId> = [0, 5].into();
        let edges = vec![rate(0, 4)];
        let mut annotations = Annotations::new();
        annotations.assign(0, Annotation::Failed, String::new).unwrap();

        annotations
            .propagate(&live, &edges, |s| if s == 4 { 5 } else { s })
            .unwrap();

        assert_eq!(annotations.get(5), Some(Annotation::Failed));
        assert_eq!(annotations.get(4), None);
    }

    #[test]
    fn test_propagation_conflict() {
        let live: BTreeSet<StateId> = [0, 1, 2].into();
        let edges = vec![rate(0, 2), rate(1, 2)];
        let mut annotations = Annotations::new();
        annotations.assign(0, Annotation::Failed, String::new).unwrap();
        annotations.assign(1, Annotation::Operational, String::new).unwrap();

        let err = annotations.propagate(&live, &edges, |s| s).unwrap_err();
        assert!(matches!(
            err,
            Error::ConflictingAnnotation {
                state: 2,
                existing: Annotation::Failed,
                incoming: Annotation::Operational,
                ..
            }
        ));
    }

    #[test]
    fn test_action_annotations_are_not_overwritten() {
        // A repair delay leads out of a failed state into a repaired one.
        let live: BTreeSet<StateId> = [0, 1, 2].into();
        let edges = vec![rate(0, 1), rate(1, 2), rate(2, 0)];
        let mut annotations = Annotations::new();
        annotations.assign(0, Annotation::Failed, String::new).unwrap();
        annotations.assign(2, Annotation::Operational, String::new).unwrap();

        assert_eq!(annotations.propagate(&live, &edges, |s| s).unwrap(), 0);
        assert_eq!(annotations.get(1), Some(Annotation::Failed));
        assert_eq!(annotations.get(2), Some(Annotation::Operational));
    }

    #[test]
    fn test_action_edges_do_not_propagate() {
        let live: BTreeSet<StateId> = [0, 1].into();
        let edges = vec![SurvivingEdge::new(
            0,
            EdgeLabel::Action("go".to_string()),
            1,
        )];
        let mut annotations = Annotations::new();
        annotations.assign(0, Annotation::Failed, String::new).unwrap();

        assert_eq!(annotations.propagate(&live, &edges, |s| s).unwrap(), 1);
        assert_eq!(annotations.get(1), None);
    }
}
