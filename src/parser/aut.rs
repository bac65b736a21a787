//! Aldebaran (`.aut`) reader
//!
//! The format is a header followed by one edge per line:
//!
//! ```text
//! des (0, 3, 3)
//! (0, "FAIL", 1)
//! (1, "rate 3.0", 2)
//! (2, i, 0)
//! ```
//!
//! The header lists the initial state, the number of edges and the number of
//! states. Labels may be quoted (with `\"` and `\\` escapes) or bare.

use crate::error::{Error, Result};
use crate::lts::{Automaton, StateId};
use regex::Regex;
use std::io::BufRead;
use std::sync::LazyLock;

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*des\s*\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*\)\s*$").expect("valid regex")
});

static EDGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*\(\s*(\d+)\s*,\s*(?:"((?:[^"\\]|\\.)*)"|([^",]*?))\s*,\s*(\d+)\s*\)\s*$"#)
        .expect("valid regex")
});

/// Header of an Aldebaran file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutHeader {
    pub initial: StateId,
    pub transitions: usize,
    pub states: StateId,
}

/// Parse the `des (...)` header line
pub fn parse_header(line: &str, line_no: usize) -> Result<AutHeader> {
    let caps = HEADER
        .captures(line)
        .ok_or_else(|| Error::parse(line_no, format!("expected \"des (initial, transitions, states)\", found {:?}", line)))?;

    let header = AutHeader {
        initial: parse_number(&caps[1], line_no)?,
        transitions: parse_number(&caps[2], line_no)?,
        states: parse_number(&caps[3], line_no)?,
    };

    if header.initial >= header.states {
        return Err(Error::parse(
            line_no,
            format!(
                "initial state {} is outside the {} declared states",
                header.initial, header.states
            ),
        ));
    }
    Ok(header)
}

/// Parse one `(from, label, to)` line
pub fn parse_edge(line: &str, line_no: usize) -> Result<(StateId, String, StateId)> {
    let caps = EDGE
        .captures(line)
        .ok_or_else(|| Error::parse(line_no, format!("malformed transition {:?}", line)))?;

    let source = parse_number(&caps[1], line_no)?;
    let target = parse_number(&caps[4], line_no)?;
    let label = match (caps.get(2), caps.get(3)) {
        (Some(quoted), _) => unescape(quoted.as_str()),
        (None, Some(bare)) => bare.as_str().trim().to_string(),
        (None, None) => String::new(),
    };
    Ok((source, label, target))
}

/// Read a complete Aldebaran automaton
pub fn read_aut(reader: impl BufRead) -> Result<Automaton> {
    let mut lines = reader
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line));

    let header = loop {
        match lines.next() {
            Some((line_no, line)) => {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                break parse_header(&line, line_no)?;
            }
            None => return Err(Error::parse(1, "empty input, expected a \"des\" header")),
        }
    };

    let mut automaton = Automaton::with_declared_states(header.initial, header.states);
    let mut last_line = 1;
    for (line_no, line) in lines {
        let line = line?;
        last_line = line_no;
        if line.trim().is_empty() {
            continue;
        }
        let (source, label, target) = parse_edge(&line, line_no)?;
        for state in [source, target] {
            if state >= header.states {
                return Err(Error::parse(
                    line_no,
                    format!(
                        "state {} is outside the {} declared states",
                        state, header.states
                    ),
                ));
            }
        }
        automaton.add_state(source);
        automaton.add_state(target);
        automaton.add_edge(source, label, target);
    }

    if automaton.graph.edge_count() != header.transitions {
        return Err(Error::parse(
            last_line,
            format!(
                "header declares {} transitions but {} were read",
                header.transitions,
                automaton.graph.edge_count()
            ),
        ));
    }

    tracing::debug!(
        "Read automaton with {} states and {} transitions",
        header.states,
        header.transitions
    );
    Ok(automaton)
}

/// Quote a label for output, escaping the characters the reader unescapes
pub fn quote_label(label: &str) -> String {
    let mut quoted = String::with_capacity(label.len() + 2);
    quoted.push('"');
    for ch in label.chars() {
        if ch == '"' || ch == '\\' {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\'
            && let Some(next) = chars.next()
        {
            out.push(next);
        } else {
            out.push(ch);
        }
    }
    out
}

fn parse_number<T: std::str::FromStr>(text: &str, line_no: usize) -> Result<T> {
    text.parse()
        .map_err(|_| Error::parse(line_no, format!("number {:?} is out of range", text)))
}
