//! Reachability exploration with maximal progress
//!
//! Breadth-first traversal from the initial state. A state with an immediate
//! (interactive or silent) edge cannot let time pass, so its delays are
//! preempted and the state is redirected to the target of that edge. Purely
//! stochastic states keep all their delays.

use crate::error::{Error, Result};
use crate::lts::{AutomatonSource, StateId};
use crate::reduction::Warning;
use crate::reduction::annotation::{Annotation, Annotations};
use crate::reduction::emit::{EdgeLabel, SurvivingEdge};
use crate::reduction::label::{Action, LabelClass, LabelClassifier};
use crate::reduction::redirect::RedirectMap;
use std::collections::{BTreeSet, VecDeque};

/// Everything the traversal learned about the automaton
#[derive(Debug, Default)]
pub struct Exploration {
    /// Every state reached, redirected or not
    pub visited: BTreeSet<StateId>,
    pub redirects: RedirectMap,
    /// Annotations written by failure and repair actions
    pub annotations: Annotations,
    /// Delays of purely stochastic states, targets not yet resolved
    pub edges: Vec<SurvivingEdge>,
    pub warnings: Vec<Warning>,
    /// Delays dropped because an immediate edge preempted them
    pub preempted: usize,
}

/// An edge together with its classification
#[derive(Debug, Clone)]
pub(crate) struct ClassifiedEdge {
    pub label: String,
    pub class: LabelClass,
    pub target: StateId,
}

/// Collect and classify the outgoing edges of `state`
pub(crate) fn classified_edges<S: AutomatonSource + ?Sized>(
    source: &S,
    classifier: &LabelClassifier,
    state: StateId,
) -> Vec<ClassifiedEdge> {
    let mut edges: Vec<ClassifiedEdge> = Vec::new();
    source.for_each_outgoing(state, &mut |label, target| {
        edges.push(ClassifiedEdge {
            label: label.to_string(),
            class: classifier.classify(label),
            target,
        });
    });
    edges
}

impl ClassifiedEdge {
    /// The label this edge keeps when it survives
    pub(crate) fn surviving_label(&self) -> Option<EdgeLabel> {
        match &self.class {
            LabelClass::Rate(expr) => Some(EdgeLabel::Rate(expr.clone())),
            LabelClass::Timed => Some(EdgeLabel::Timed(self.label.clone())),
            LabelClass::Interactive(_) => Some(EdgeLabel::Action(self.label.clone())),
            LabelClass::Silent => None,
        }
    }
}

/// Explore `source` from its initial state
pub fn explore<S: AutomatonSource + ?Sized>(
    source: &S,
    classifier: &LabelClassifier,
) -> Result<Exploration> {
    let mut exploration = Exploration::default();
    let mut worklist = VecDeque::new();

    let initial = source.initial_state();
    exploration.visited.insert(initial);
    worklist.push_back(initial);

    while let Some(state) = worklist.pop_front() {
        let edges = classified_edges(source, classifier, state);
        let mut immediate = edges.iter().filter(|e| e.class.is_immediate());
        let first = immediate.next();
        // A repeated copy of the same edge is not a choice.
        let second =
            first.and_then(|f| immediate.find(|e| e.label != f.label || e.target != f.target));

        let successors: Vec<StateId> = match (first, second) {
            (Some(first), Some(second)) => {
                return Err(Error::Nondeterminism {
                    state,
                    first: first.label.clone(),
                    second: second.label.clone(),
                });
            }
            (Some(edge), None) => {
                exploration.redirect(state, edge)?;
                exploration.preempted += edges.iter().filter(|e| e.class.is_stochastic()).count();
                vec![edge.target]
            }
            (None, _) => edges
                .iter()
                .filter_map(|edge| {
                    let label = edge.surviving_label()?;
                    exploration
                        .edges
                        .push(SurvivingEdge::new(state, label, edge.target));
                    Some(edge.target)
                })
                .collect(),
        };

        for target in successors {
            if exploration.visited.insert(target) {
                worklist.push_back(target);
            }
        }
    }

    tracing::debug!(
        "Explored {} states: {} redirected, {} delays preempted",
        exploration.visited.len(),
        exploration.redirects.len(),
        exploration.preempted
    );
    Ok(exploration)
}

impl Exploration {
    /// Record the redirect caused by the single immediate edge of `state`
    fn redirect(&mut self, state: StateId, edge: &ClassifiedEdge) -> Result<()> {
        let annotation = match &edge.class {
            LabelClass::Interactive(Action::Failure) => Some(Annotation::Failed),
            LabelClass::Interactive(Action::Repair) => Some(Annotation::Operational),
            LabelClass::Interactive(Action::Other(name)) => {
                self.warnings.push(Warning::UnknownLabel {
                    state,
                    label: name.clone(),
                });
                None
            }
            _ => None,
        };

        if let Some(annotation) = annotation {
            self.annotations.assign(edge.target, annotation, || {
                format!("action \"{}\" from state {}", edge.label, state)
            })?;
        }
        self.redirects.insert(state, edge.target, edge.label.as_str());
        Ok(())
    }

    /// Reached states that are not redirected
    pub fn live_states(&self) -> BTreeSet<StateId> {
        self.visited
            .iter()
            .copied()
            .filter(|&s| !self.redirects.contains(s))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lts::Automaton;

    fn classifier() -> LabelClassifier {
        LabelClassifier::new("FAIL", Some("REPAIR".to_string()))
    }

    #[test]
    fn test_failure_redirect() {
        let automaton = Automaton::from_edges(0, [(0, "FAIL", 1), (1, "rate 3.0", 1)]);

        let exploration = explore(&automaton, &classifier()).unwrap();

        assert_eq!(exploration.redirects.resolve(0), 1);
        assert_eq!(exploration.annotations.get(1), Some(Annotation::Failed));
        assert_eq!(exploration.live_states(), [1].into());
        assert_eq!(
            exploration.edges,
            vec![SurvivingEdge::new(1, EdgeLabel::Rate("3.0".into()), 1)]
        );
    }

    #[test]
    fn test_immediate_edge_preempts_delays() {
        let automaton = Automaton::from_edges(
            0,
            [(0, "rate 1", 2), (0, "i", 1), (0, "time 5", 3), (1, "rate 2", 0)],
        );

        let exploration = explore(&automaton, &classifier()).unwrap();

        assert_eq!(exploration.preempted, 2);
        assert_eq!(exploration.visited, [0, 1].into());
        assert!(!exploration.visited.contains(&2));
        assert!(!exploration.visited.contains(&3));
    }

    #[test]
    fn test_nondeterminism() {
        let automaton = Automaton::from_edges(0, [(0, "FAIL", 1), (0, "i", 2)]);

        let err = explore(&automaton, &classifier()).unwrap_err();
        match err {
            Error::Nondeterminism {
                state,
                first,
                second,
            } => {
                assert_eq!(state, 0);
                assert_eq!(first, "FAIL");
                assert_eq!(second, "i");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_silent_edge_counts_as_immediate() {
        let automaton = Automaton::from_edges(0, [(0, "", 1), (0, "i", 2)]);
        let err = explore(&automaton, &classifier()).unwrap_err();
        assert!(matches!(err, Error::Nondeterminism { .. }));

        let automaton = Automaton::from_edges(0, [(0, "", 1), (1, "rate 1", 0)]);
        let exploration = explore(&automaton, &classifier()).unwrap();
        assert_eq!(exploration.redirects.resolve(0), 1);
        assert!(exploration.warnings.is_empty());
    }

    #[test]
    fn test_duplicate_immediate_edge_is_not_nondeterminism() {
        let automaton = Automaton::from_edges(0, [(0, "i", 1), (0, "i", 1)]);
        let exploration = explore(&automaton, &classifier()).unwrap();
        assert_eq!(exploration.redirects.resolve(0), 1);
    }

    #[test]
    fn test_unknown_action_warns() {
        let automaton = Automaton::from_edges(0, [(0, "rate 1", 1), (1, "ONLINE", 2)]);

        let exploration = explore(&automaton, &classifier()).unwrap();

        assert_eq!(
            exploration.warnings,
            vec![Warning::UnknownLabel {
                state: 1,
                label: "ONLINE".to_string()
            }]
        );
        assert_eq!(exploration.redirects.resolve(1), 2);
        assert_eq!(exploration.annotations.get(2), None);
    }

    #[test]
    fn test_failure_and_repair_into_same_state() {
        let automaton = Automaton::from_edges(
            0,
            [
                (0, "rate 1", 1),
                (0, "rate 2", 2),
                (1, "FAIL", 3),
                (2, "REPAIR", 3),
            ],
        );

        let err = explore(&automaton, &classifier()).unwrap_err();
        assert!(matches!(err, Error::ConflictingAnnotation { state: 3, .. }));
    }

    #[test]
    fn test_unreachable_states_are_not_visited() {
        let automaton = Automaton::from_edges(0, [(0, "rate 1", 1), (2, "rate 1", 0)]);
        let exploration = explore(&automaton, &classifier()).unwrap();
        assert_eq!(exploration.visited, [0, 1].into());
    }
}
