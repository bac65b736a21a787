//! Aldebaran (`.aut`) writer

use crate::Result;
use crate::export::CountPlaceholder;
use crate::parser::aut::quote_label;
use crate::reduction::ReducedGraph;
use std::io::{Seek, Write};

/// Write `graph` in Aldebaran format and return the number of transitions.
///
/// Aldebaran numbers states from 0, so every state number is shifted down
/// by one.
pub fn write_aut<W: Write + Seek>(w: &mut W, graph: &ReducedGraph) -> Result<usize> {
    write!(w, "des ({}, ", graph.initial - 1)?;
    let placeholder = CountPlaceholder::write(w)?;
    writeln!(w, ", {})", graph.state_count)?;

    let mut written = 0;
    for transition in &graph.transitions {
        writeln!(
            w,
            "({}, {}, {})",
            transition.source - 1,
            quote_label(&transition.label.to_label_text()),
            transition.target - 1
        )?;
        written += 1;
    }

    placeholder.patch(w, written)?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lts::AutomatonSource;
    use crate::parser::read_aut;
    use crate::reduction::{EdgeLabel, ReducedTransition};
    use std::io::Cursor;

    fn graph() -> ReducedGraph {
        ReducedGraph {
            initial: 2,
            state_count: 2,
            transitions: vec![
                ReducedTransition {
                    source: 1,
                    label: EdgeLabel::Rate("0.5".into()),
                    target: 2,
                },
                ReducedTransition {
                    source: 2,
                    label: EdgeLabel::Action("go".into()),
                    target: 1,
                },
            ],
            labels: Vec::new(),
        }
    }

    #[test]
    fn test_header_matches_records() {
        let mut w = Cursor::new(Vec::new());
        assert_eq!(write_aut(&mut w, &graph()).unwrap(), 2);

        let text = String::from_utf8(w.into_inner()).unwrap();
        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("des (1, "));
        assert!(header.ends_with(" 2, 2)"));
        assert_eq!(lines.next(), Some("(0, \"rate 0.5\", 1)"));
        assert_eq!(lines.next(), Some("(1, \"go\", 0)"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_output_reads_back() {
        let mut w = Cursor::new(Vec::new());
        write_aut(&mut w, &graph()).unwrap();

        let automaton = read_aut(w.into_inner().as_slice()).unwrap();
        assert_eq!(automaton.initial_state(), 1);
        assert_eq!(automaton.state_count(), 2);
        assert_eq!(automaton.edge_count(), 2);
    }

    #[test]
    fn test_empty_graph() {
        let graph = ReducedGraph {
            initial: 1,
            state_count: 1,
            transitions: Vec::new(),
            labels: Vec::new(),
        };
        let mut w = Cursor::new(Vec::new());
        assert_eq!(write_aut(&mut w, &graph).unwrap(), 0);
        let automaton = read_aut(w.into_inner().as_slice()).unwrap();
        assert_eq!(automaton.edge_count(), 0);
    }
}
