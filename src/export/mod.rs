//! Export module - writers for reduced graphs
//!
//! Writers borrow a [`ReducedGraph`](crate::reduction::ReducedGraph) and own
//! all format syntax. Formats that announce the number of transitions before
//! listing them write a fixed-width placeholder and patch it once the records
//! are out, so the header always matches what was written.

use crate::Result;
use std::io::{Seek, SeekFrom, Write};

pub mod aut;
pub mod jani;
pub mod tralab;

pub use aut::write_aut;
pub use jani::{jani_document, write_jani};
pub use tralab::{write_lab, write_tra};

/// Width of a patched count; enough for any `u64`
const COUNT_WIDTH: usize = 20;

/// A count written as blanks, to be filled in later
#[derive(Debug)]
pub(crate) struct CountPlaceholder {
    position: u64,
}

impl CountPlaceholder {
    pub(crate) fn write<W: Write + Seek>(w: &mut W) -> Result<Self> {
        let position = w.stream_position()?;
        write!(w, "{:>width$}", "", width = COUNT_WIDTH)?;
        Ok(Self { position })
    }

    /// Overwrite the placeholder with `count`, right-aligned, and return to
    /// the end of the stream
    pub(crate) fn patch<W: Write + Seek>(self, w: &mut W, count: usize) -> Result<()> {
        let end = w.stream_position()?;
        w.seek(SeekFrom::Start(self.position))?;
        write!(w, "{:>width$}", count, width = COUNT_WIDTH)?;
        w.seek(SeekFrom::Start(end))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_placeholder_is_patched_in_place() {
        let mut w = Cursor::new(Vec::new());
        write!(w, "count=").unwrap();
        let placeholder = CountPlaceholder::write(&mut w).unwrap();
        write!(w, ";rest").unwrap();
        placeholder.patch(&mut w, 42).unwrap();
        write!(w, "!").unwrap();

        let text = String::from_utf8(w.into_inner()).unwrap();
        assert_eq!(text, format!("count={:>20};rest!", 42));
    }
}
