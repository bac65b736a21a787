//! Edge representation

use crate::lts::StateId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An edge as produced by an automaton source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawEdge {
    pub source: StateId,
    pub label: String,
    pub target: StateId,
}

impl RawEdge {
    pub fn new(source: StateId, label: impl Into<String>, target: StateId) -> Self {
        Self {
            source,
            label: label.into(),
            target,
        }
    }
}

impl fmt::Display for RawEdge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {:?}, {})", self.source, self.label, self.target)
    }
}
