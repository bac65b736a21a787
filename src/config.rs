//! Configuration management
//!
//! This module handles loading and managing configuration from:
//! - Command-line arguments
//! - Configuration files (TOML)
//! - Defaults

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub labels: LabelConfig,

    #[serde(default)]
    pub reduction: ReductionConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Names of the interactive actions with a special effect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfig {
    /// Action marking the target state as failed
    #[serde(default = "default_failure_label")]
    pub failure: String,

    /// Action marking the target state as operational again
    pub repair: Option<String>,
}

/// Reduction settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReductionConfig {
    /// Merge live states with identical outgoing transitions
    #[serde(default)]
    pub merge_identical: bool,
}

/// Writer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Model name written into JANI documents
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Pretty-print JSON output
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions

fn default_failure_label() -> String {
    "FAIL".to_string()
}

fn default_model_name() -> String {
    "lts".to_string()
}

fn default_pretty() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

// Default implementations

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            failure: default_failure_label(),
            repair: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            model_name: default_model_name(),
            pretty: default_pretty(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

        toml::from_str(&contents).map_err(|e| Error::ConfigParse {
            file: path,
            message: e.to_string(),
        })
    }

    /// Load configuration from default locations
    ///
    /// Searches in order:
    /// 1. ./lts-reduce.toml
    /// 2. ~/.lts-reduce/config.toml
    /// 3. /etc/lts-reduce/config.toml
    pub fn load() -> Result<Self> {
        let mut paths = vec![PathBuf::from("lts-reduce.toml")];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".lts-reduce").join("config.toml"));
        }
        paths.push(PathBuf::from("/etc/lts-reduce/config.toml"));

        for path in paths {
            if path.exists() {
                tracing::info!("Loading config from {:?}", path);
                return Self::from_file(path);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Override label names with the ones given on the command line
    pub fn with_labels(mut self, failure: Option<String>, repair: Option<String>) -> Self {
        if let Some(failure) = failure {
            self.labels.failure = failure;
        }
        if repair.is_some() {
            self.labels.repair = repair;
        }
        self
    }
}
