//! This module defines all error types used throughout the application.

use crate::lts::StateId;
use crate::reduction::Annotation;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the application
///
/// Every structural variant is fatal: a run that hits one produces no output.
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Automaton input could not be parsed
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be parsed
    #[error("Configuration parse error in {file:?}: {message}")]
    ConfigParse { file: PathBuf, message: String },

    /// More than one immediate transition leaves the same state
    #[error(
        "Nondeterminism in state {state}: immediate transitions \"{first}\" and \"{second}\" are both enabled"
    )]
    Nondeterminism {
        state: StateId,
        first: String,
        second: String,
    },

    /// A state would receive two different classifications
    #[error(
        "Conflicting annotation for state {state}: already {existing}, {cause} marks it {incoming}"
    )]
    ConflictingAnnotation {
        state: StateId,
        existing: Annotation,
        incoming: Annotation,
        cause: String,
    },

    /// The redirect chain of the initial state never reaches a stable state
    #[error("Initial state is interactive: redirect chain from state {state} has no stable target")]
    InitialRedirect { state: StateId },

    /// A redirect chain loops back on itself
    #[error("Redirect cycle through state {state}: interactive transitions never reach a stable state")]
    RedirectCycle { state: StateId },

    /// An emitted transition points outside the renumbered state set
    #[error("Transition from state {from} targets state {target}, which is not part of the reduced graph")]
    DanglingTarget { from: StateId, target: StateId },

    /// A transition label the selected output format cannot represent
    #[error("The {format} format cannot represent transition label \"{label}\"")]
    UnsupportedLabel { format: &'static str, label: String },

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a custom error with a message
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create a parse error for the given 1-based line
    pub fn parse(line: usize, msg: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: msg.into(),
        }
    }

    /// Create an unsupported label error
    pub fn unsupported_label(format: &'static str, label: impl Into<String>) -> Self {
        Self::UnsupportedLabel {
            format,
            label: label.into(),
        }
    }

    /// Check if the error comes from the structure of the automaton
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Error::Nondeterminism { .. }
                | Error::ConflictingAnnotation { .. }
                | Error::InitialRedirect { .. }
                | Error::RedirectCycle { .. }
                | Error::DanglingTarget { .. }
        )
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParse {
            file: PathBuf::from("unknown"),
            message: err.to_string(),
        }
    }
}

// Helper macros for creating errors

/// Create a custom error with formatting
#[macro_export]
macro_rules! custom_error {
    ($($arg:tt)*) => {
        $crate::error::Error::Custom(format!($($arg)*))
    };
}

/// Bail with a custom error message
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::custom_error!($($arg)*))
    };
}

/// Ensure a condition is true or return error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($($arg)*);
        }
    };
}
