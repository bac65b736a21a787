//! Transition label classification
//!
//! Labels carry their meaning in their text: `rate <expr>` is an exponentially
//! distributed delay, `time <expr>` a timed delay, an empty label is silent,
//! and everything else is an interactive action. Every reduction goes through
//! [`LabelClassifier::classify`] instead of inspecting label text itself.

use crate::config::LabelConfig;
use std::fmt;

const RATE_PREFIX: &str = "rate ";
const TIME_PREFIX: &str = "time ";
const ANONYMOUS_ACTION: &str = "i";

/// Semantic class of a transition label
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LabelClass {
    /// Internal, unobservable step
    Silent,
    /// Exponentially distributed delay with the given rate expression
    Rate(String),
    /// Timed delay
    Timed,
    /// Immediate action
    Interactive(Action),
}

/// Interactive actions, refined by their effect on the failure classification
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    /// The anonymous action `i`
    Anonymous,
    /// The configured failure action
    Failure,
    /// The configured repair action
    Repair,
    /// Any other action; its effect is unknown
    Other(String),
}

impl LabelClass {
    /// Interactive and silent edges take no time and preempt delays
    pub fn is_immediate(&self) -> bool {
        matches!(self, LabelClass::Silent | LabelClass::Interactive(_))
    }

    /// Rate and timed edges let time pass
    pub fn is_stochastic(&self) -> bool {
        matches!(self, LabelClass::Rate(_) | LabelClass::Timed)
    }

    /// The label fell through to the default interactive class
    pub fn is_unknown(&self) -> bool {
        matches!(self, LabelClass::Interactive(Action::Other(_)))
    }
}

impl fmt::Display for LabelClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LabelClass::Silent => write!(f, "silent"),
            LabelClass::Rate(expr) => write!(f, "rate {}", expr),
            LabelClass::Timed => write!(f, "timed"),
            LabelClass::Interactive(Action::Anonymous) => write!(f, "action i"),
            LabelClass::Interactive(Action::Failure) => write!(f, "failure action"),
            LabelClass::Interactive(Action::Repair) => write!(f, "repair action"),
            LabelClass::Interactive(Action::Other(name)) => write!(f, "action {}", name),
        }
    }
}

/// Maps label text to a [`LabelClass`]
#[derive(Debug, Clone)]
pub struct LabelClassifier {
    failure: String,
    repair: Option<String>,
}

impl LabelClassifier {
    pub fn new(failure: impl Into<String>, repair: Option<String>) -> Self {
        Self {
            failure: failure.into(),
            repair,
        }
    }

    pub fn from_config(config: &LabelConfig) -> Self {
        Self::new(config.failure.clone(), config.repair.clone())
    }

    /// Classify a label. Total: every string has exactly one class.
    pub fn classify(&self, label: &str) -> LabelClass {
        if label.is_empty() {
            LabelClass::Silent
        } else if let Some(expr) = label.strip_prefix(RATE_PREFIX) {
            LabelClass::Rate(expr.trim().to_string())
        } else if label.starts_with(TIME_PREFIX) {
            LabelClass::Timed
        } else if label == ANONYMOUS_ACTION {
            LabelClass::Interactive(Action::Anonymous)
        } else if label == self.failure {
            LabelClass::Interactive(Action::Failure)
        } else if self.repair.as_deref() == Some(label) {
            LabelClass::Interactive(Action::Repair)
        } else {
            LabelClass::Interactive(Action::Other(label.to_string()))
        }
    }
}

impl Default for LabelClassifier {
    fn default() -> Self {
        Self::from_config(&LabelConfig::default())
    }
}
