//! Parser module - reading automata from their textual representations

use crate::{Result, lts::Automaton};
use std::path::Path;

pub mod aut;

pub use aut::read_aut;

/// Read an automaton file, choosing the format from its extension
pub fn read_automaton(path: &Path) -> Result<Automaton> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("aut") | None => {
            let file = std::fs::File::open(path)?;
            read_aut(std::io::BufReader::new(file))
        }
        Some(other) => Err(crate::custom_error!(
            "Unsupported automaton format \".{}\" for {:?}",
            other,
            path
        )),
    }
}
