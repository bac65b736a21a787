//! Output formatting module
//!
//! This module formats automaton and reduction statistics for the `info`
//! command.

use crate::{Result, lts::AutomatonStats, reduction::Reduction};
use serde_json::json;

/// Output statistics as JSON
pub fn output_json(
    w: &mut impl std::io::Write,
    automaton: &AutomatonStats,
    reduction: &Reduction,
) -> Result<()> {
    let output = json!({
        "automaton": automaton,
        "reduction": reduction.stats,
        "failed_states": reduction.graph.failed_states().collect::<Vec<_>>(),
        "rates_only": !reduction.graph.has_non_rate_transitions(),
        "warnings": reduction.warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
    });

    serde_json::to_writer_pretty(&mut *w, &output)?;
    writeln!(w)?; // Add trailing newline
    Ok(())
}

/// Output statistics as text table
pub fn output_table(
    w: &mut impl std::io::Write,
    automaton: &AutomatonStats,
    reduction: &Reduction,
) -> Result<()> {
    let stats = &reduction.stats;

    writeln!(w, "LTS Reduction - Analysis Results")?;
    writeln!(w, "{}", "=".repeat(60))?;
    writeln!(w)?;

    writeln!(w, "Input:")?;
    writeln!(w, "  Initial State:      {}", automaton.initial_state)?;
    writeln!(w, "  States:             {}", automaton.total_states)?;
    writeln!(w, "  Transitions:        {}", automaton.total_edges)?;
    writeln!(w, "  Deadlock States:    {}", automaton.deadlock_states)?;
    writeln!(w)?;

    writeln!(w, "Reduction:")?;
    writeln!(w, "  Reachable States:   {}", stats.reachable_states)?;
    writeln!(w, "  Redirected States:  {}", stats.redirected_states)?;
    writeln!(w, "  Merged States:      {}", stats.merged_states)?;
    writeln!(w, "  Preempted Delays:   {}", stats.preempted_delays)?;
    writeln!(w, "  Unannotated States: {}", stats.unknown_annotations)?;
    writeln!(w)?;

    writeln!(w, "Output:")?;
    writeln!(w, "  States:             {}", stats.output_states)?;
    writeln!(w, "  Transitions:        {}", stats.output_transitions)?;
    writeln!(w, "  Failed States:      {}", stats.failed_states)?;
    writeln!(w)?;

    if !reduction.warnings.is_empty() {
        writeln!(w, "Warnings:")?;
        writeln!(w, "{:-<60}", "")?;
        for warning in &reduction.warnings {
            writeln!(w, "  {}", warning)?;
        }
        writeln!(w)?;
    }

    Ok(())
}
