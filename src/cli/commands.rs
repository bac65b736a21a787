//! CLI command implementations
//!
//! This module contains the implementation for each CLI command.

use crate::cli::ModelFormat;
use crate::export::{write_aut, write_jani, write_lab, write_tra};
use crate::reduction::{ReducedGraph, Warning};
use crate::{Config, Error, Result};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Occurrence count and first state of each unknown label
fn group_warnings(warnings: &[Warning]) -> BTreeMap<&str, (usize, u32)> {
    let mut by_label: BTreeMap<&str, (usize, u32)> = BTreeMap::new();
    for warning in warnings {
        let Warning::UnknownLabel { state, label } = warning;
        by_label.entry(label.as_str()).or_insert((0, *state)).0 += 1;
    }
    by_label
}

/// Report warnings once per label, with the number of occurrences
fn report_warnings(warnings: &[Warning]) {
    for (label, (count, state)) in group_warnings(warnings) {
        if count == 1 {
            tracing::warn!(
                "Unknown transition label \"{}\" in state {}, assuming no special effect",
                label,
                state
            );
        } else {
            tracing::warn!(
                "Unknown transition label \"{}\" in {} states (first: {}), assuming no special effect",
                label,
                count,
                state
            );
        }
    }
}

/// Remove a file written before a later step failed
fn remove_output(path: &Path) {
    if path.exists()
        && let Err(e) = std::fs::remove_file(path)
    {
        tracing::warn!("Failed to remove partial output {:?}: {}", path, e);
    }
}

/// `prefix` with `extension` appended, keeping any dots already in it
fn with_suffix(prefix: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// Create `path`, run `write` on it, and remove the file if anything fails
fn write_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let result = File::create(path).map_err(Error::from).and_then(|file| {
        let mut w = BufWriter::new(file);
        write(&mut w)?;
        w.flush()?;
        Ok(())
    });

    if result.is_err() {
        remove_output(path);
    }
    result
}

/// Write `graph` to `output` in `format`; returns the files written
fn write_model(
    graph: &ReducedGraph,
    output: &Path,
    format: ModelFormat,
    config: &Config,
) -> Result<Vec<PathBuf>> {
    match format {
        ModelFormat::Aut => {
            write_file(output, |w| write_aut(w, graph).map(|_| ()))?;
            Ok(vec![output.to_path_buf()])
        }
        ModelFormat::Jani => {
            write_file(output, |w| {
                write_jani(w, graph, &config.output.model_name, config.output.pretty)
            })?;
            Ok(vec![output.to_path_buf()])
        }
        ModelFormat::Tralab => {
            let tra = with_suffix(output, "tra");
            let lab = with_suffix(output, "lab");
            write_file(&tra, |w| write_tra(w, graph).map(|_| ()))?;
            if let Err(e) = write_file(&lab, |w| write_lab(w, graph)) {
                remove_output(&tra);
                return Err(e);
            }
            Ok(vec![tra, lab])
        }
    }
}

/// Convert command implementation
pub mod convert {
    use super::*;
    use crate::parser::read_automaton;
    use crate::reduction::{ReductionOptions, reduce};

    /// Execute the convert command
    pub fn execute(input: &Path, output: &Path, format: ModelFormat, config: &Config) -> Result<()> {
        tracing::info!("Reading automaton from {:?}", input);
        let automaton = read_automaton(input)?;

        let options = ReductionOptions::from_config(config);
        let reduction = reduce(&automaton, &options)?;
        report_warnings(&reduction.warnings);

        let written = write_model(&reduction.graph, output, format, config)?;
        tracing::info!(
            "Wrote {} states and {} transitions ({} failed) to {:?}",
            reduction.stats.output_states,
            reduction.stats.output_transitions,
            reduction.stats.failed_states,
            written
        );
        Ok(())
    }
}

/// Maxprog command implementation
pub mod maxprog {
    use super::*;
    use crate::parser::read_automaton;
    use crate::reduction::{ReductionOptions, maximal_progress};

    /// Execute the maxprog command
    pub fn execute(input: &Path, output: &Path, format: ModelFormat, config: &Config) -> Result<()> {
        if format == ModelFormat::Tralab {
            return Err(Error::custom(
                "tralab output holds rates only; use aut or jani for maximal progress",
            ));
        }

        tracing::info!("Reading automaton from {:?}", input);
        let automaton = read_automaton(input)?;

        let options = ReductionOptions::from_config(config);
        let reduction = maximal_progress(&automaton, &options)?;
        report_warnings(&reduction.warnings);

        let written = write_model(&reduction.graph, output, format, config)?;
        tracing::info!(
            "Wrote {} states and {} transitions, {} delays preempted, to {:?}",
            reduction.stats.output_states,
            reduction.stats.output_transitions,
            reduction.stats.preempted_delays,
            written
        );
        Ok(())
    }
}

/// Info command implementation
pub mod info {
    use super::*;
    use crate::cli::ReportFormat;
    use crate::cli::output::{output_json, output_table};
    use crate::parser::read_automaton;
    use crate::reduction::{ReductionOptions, reduce};

    /// Execute the info command
    pub fn execute(input: &Path, format: ReportFormat, config: &Config) -> Result<()> {
        let automaton = read_automaton(input)?;
        let automaton_stats = automaton.stats();

        let options = ReductionOptions::from_config(config);
        let reduction = reduce(&automaton, &options)?;

        let mut stdout = std::io::stdout();
        match format {
            ReportFormat::Json => output_json(&mut stdout, &automaton_stats, &reduction),
            ReportFormat::Table => output_table(&mut stdout, &automaton_stats, &reduction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reduction::{Annotation, EdgeLabel, ReducedTransition};

    fn graph(label: EdgeLabel) -> ReducedGraph {
        ReducedGraph {
            initial: 1,
            state_count: 1,
            transitions: vec![ReducedTransition {
                source: 1,
                label,
                target: 1,
            }],
            labels: vec![Annotation::Operational],
        }
    }

    #[test]
    fn test_with_suffix_keeps_dots() {
        assert_eq!(
            with_suffix(Path::new("out/model.v2"), "tra"),
            PathBuf::from("out/model.v2.tra")
        );
    }

    #[test]
    fn test_tralab_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("model");

        let written = write_model(
            &graph(EdgeLabel::Rate("2".into())),
            &prefix,
            ModelFormat::Tralab,
            &Config::default(),
        )
        .unwrap();

        assert_eq!(written.len(), 2);
        assert!(dir.path().join("model.tra").exists());
        assert!(dir.path().join("model.lab").exists());
    }

    #[test]
    fn test_failed_write_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("model");

        let err = write_model(
            &graph(EdgeLabel::Action("go".into())),
            &prefix,
            ModelFormat::Tralab,
            &Config::default(),
        )
        .unwrap_err();

        assert!(matches!(err, Error::UnsupportedLabel { .. }));
        assert!(!dir.path().join("model.tra").exists());
        assert!(!dir.path().join("model.lab").exists());
    }

    #[test]
    fn test_lab_failure_removes_tra() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("model");
        // A directory in the way makes the .lab file impossible to create.
        std::fs::create_dir(dir.path().join("model.lab")).unwrap();

        let err = write_model(
            &graph(EdgeLabel::Rate("2".into())),
            &prefix,
            ModelFormat::Tralab,
            &Config::default(),
        )
        .unwrap_err();

        assert!(matches!(err, Error::Io(_)));
        assert!(!dir.path().join("model.tra").exists());
        assert!(dir.path().join("model.lab").is_dir());
    }

    #[test]
    fn test_warnings_are_grouped_by_label() {
        let warning = |state, label: &str| Warning::UnknownLabel {
            state,
            label: label.to_string(),
        };
        let warnings = [warning(4, "a"), warning(1, "b"), warning(2, "a")];

        let grouped = group_warnings(&warnings);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["a"], (2, 4));
        assert_eq!(grouped["b"], (1, 1));
    }
}
