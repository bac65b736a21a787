//! Transition/label text pair (`.tra` + `.lab`)
//!
//! `.tra` lists the rate matrix row by row after a `STATES` / `TRANSITIONS`
//! header; `.lab` declares the atomic propositions `init` and `failed` and
//! lists, per state, the ones that hold. States are numbered from 1.

use crate::error::{Error, Result};
use crate::export::CountPlaceholder;
use crate::reduction::{EdgeLabel, ReducedGraph};
use std::io::{Seek, Write};

/// Write the rate matrix and return the number of transitions.
///
/// Only Markovian delays with a positive numeric rate can be written; any
/// other edge aborts with [`Error::UnsupportedLabel`].
pub fn write_tra<W: Write + Seek>(w: &mut W, graph: &ReducedGraph) -> Result<usize> {
    let mut rows: Vec<_> = graph.transitions.iter().collect();
    rows.sort_by_key(|t| (t.source, t.target));

    writeln!(w, "STATES {}", graph.state_count)?;
    write!(w, "TRANSITIONS ")?;
    let placeholder = CountPlaceholder::write(w)?;
    writeln!(w)?;

    let mut written = 0;
    for transition in rows {
        let Some(rate) = numeric_rate(&transition.label) else {
            return Err(Error::unsupported_label(
                "tra",
                transition.label.to_label_text(),
            ));
        };
        writeln!(w, "{} {} {}", transition.source, transition.target, rate)?;
        written += 1;
    }

    placeholder.patch(w, written)?;
    Ok(written)
}

/// Rate text of a delay, if it is a finite positive number
fn numeric_rate(label: &EdgeLabel) -> Option<&str> {
    let EdgeLabel::Rate(rate) = label else {
        return None;
    };
    let value: f64 = rate.trim().parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(rate.trim())
}

/// Write the state labels
pub fn write_lab<W: Write>(w: &mut W, graph: &ReducedGraph) -> Result<()> {
    writeln!(w, "#DECLARATION")?;
    writeln!(w, "init failed")?;
    writeln!(w, "#END")?;

    for state in 1..=graph.state_count {
        let mut props = Vec::new();
        if state == graph.initial {
            props.push("init");
        }
        if graph.label(state).is_some_and(|a| a.is_failed()) {
            props.push("failed");
        }
        if !props.is_empty() {
            writeln!(w, "{} {}", state, props.join(" "))?;
        }
    }
    Ok(())
}
