//! CLI module
//!
//! This module defines the command-line interface using clap and implements
//! the command execution logic.

use crate::{Config, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;
pub mod output;

/// Reduce labeled transition systems to Markov chains
#[derive(Parser, Debug)]
#[command(name = "lts-reduce")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (overrides config)
    #[arg(long, global = true, env = "LTS_REDUCE_LOG")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Collapse immediate transitions and write the reduced chain
    Convert {
        /// Input automaton (.aut)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file; for tralab the prefix of the .tra and .lab files
        #[arg(short, long)]
        output: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "jani")]
        format: ModelFormat,

        /// Name of the failure action (overrides config)
        #[arg(long)]
        failure: Option<String>,

        /// Name of the repair action (overrides config)
        #[arg(long)]
        repair: Option<String>,

        /// Merge live states with identical behaviour
        #[arg(long)]
        merge_identical: bool,
    },

    /// Drop preempted delays but keep states and actions
    Maxprog {
        /// Input automaton (.aut)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "aut")]
        format: ModelFormat,
    },

    /// Print statistics about an automaton and its reduction
    Info {
        /// Input automaton (.aut)
        #[arg(short, long)]
        input: PathBuf,

        /// Report format
        #[arg(short, long, value_enum, default_value = "table")]
        format: ReportFormat,
    },
}

/// Model output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelFormat {
    /// Aldebaran automaton
    Aut,
    /// Transition matrix and state labelling (.tra/.lab)
    Tralab,
    /// JANI model
    Jani,
}

/// Report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Plain text table
    Table,
    /// JSON output
    Json,
}

/// Execute the CLI command
pub fn execute(args: Cli, config: Config) -> Result<()> {
    match args.command {
        Commands::Convert {
            input,
            output,
            format,
            failure,
            repair,
            merge_identical,
        } => {
            let mut config = config.with_labels(failure, repair);
            config.reduction.merge_identical |= merge_identical;
            commands::convert::execute(&input, &output, format, &config)
        }
        Commands::Maxprog {
            input,
            output,
            format,
        } => commands::maxprog::execute(&input, &output, format, &config),
        Commands::Info { input, format } => commands::info::execute(&input, format, &config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "lts-reduce",
            "convert",
            "--input",
            "model.aut",
            "--output",
            "model.jani",
        ])
        .unwrap();

        match cli.command {
            Commands::Convert {
                format,
                failure,
                merge_identical,
                ..
            } => {
                assert_eq!(format, ModelFormat::Jani);
                assert_eq!(failure, None);
                assert!(!merge_identical);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_label_overrides() {
        let cli = Cli::try_parse_from([
            "lts-reduce",
            "convert",
            "-i",
            "in.aut",
            "-o",
            "out",
            "--format",
            "tralab",
            "--failure",
            "DOWN",
            "--repair",
            "UP",
            "--merge-identical",
        ])
        .unwrap();

        match cli.command {
            Commands::Convert {
                format,
                failure,
                repair,
                merge_identical,
                ..
            } => {
                assert_eq!(format, ModelFormat::Tralab);
                assert_eq!(failure.as_deref(), Some("DOWN"));
                assert_eq!(repair.as_deref(), Some("UP"));
                assert!(merge_identical);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_options() {
        let cli = Cli::try_parse_from([
            "lts-reduce",
            "info",
            "--input",
            "in.aut",
            "--config",
            "custom.toml",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(
            cli.command,
            Commands::Info {
                format: ReportFormat::Json,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_input_is_rejected() {
        assert!(Cli::try_parse_from(["lts-reduce", "maxprog", "--output", "x.aut"]).is_err());
    }
}
