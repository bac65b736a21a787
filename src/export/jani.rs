//! JANI model-exchange writer
//!
//! The reduced graph becomes a single automaton with one location per state.
//! Failure is a transient boolean variable `failed` set by the locations of
//! failed states. Markovian delays are rate edges; interactive edges use named
//! actions and turn the model into a Markov automaton.

use crate::error::{Error, Result};
use crate::reduction::{EdgeLabel, ReducedGraph};
use regex::Regex;
use serde_json::{Value, json};
use std::collections::BTreeSet;
use std::io::Write;
use std::sync::LazyLock;

const JANI_VERSION: u32 = 1;
const FAILED_VARIABLE: &str = "failed";

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"));

fn location(state: u32) -> String {
    format!("s{}", state)
}

/// Rate expressions are numbers or the name of a constant
fn rate_expression(expr: &str, constants: &mut BTreeSet<String>) -> Result<Value> {
    if let Ok(value) = expr.parse::<f64>()
        && let Some(number) = serde_json::Number::from_f64(value)
    {
        return Ok(Value::Number(number));
    }
    if IDENTIFIER.is_match(expr) {
        constants.insert(expr.to_string());
        return Ok(Value::String(expr.to_string()));
    }
    Err(Error::unsupported_label("JANI", format!("rate {}", expr)))
}

/// Build the JANI document for `graph`
pub fn jani_document(graph: &ReducedGraph, model_name: &str) -> Result<Value> {
    let mut actions = BTreeSet::new();
    let mut constants = BTreeSet::new();
    let mut edges = Vec::with_capacity(graph.transitions.len());

    for transition in &graph.transitions {
        let destinations = json!([{ "location": location(transition.target) }]);
        let edge = match &transition.label {
            EdgeLabel::Rate(expr) => json!({
                "location": location(transition.source),
                "rate": { "exp": rate_expression(expr, &mut constants)? },
                "destinations": destinations,
            }),
            EdgeLabel::Action(name) => {
                actions.insert(name.clone());
                json!({
                    "location": location(transition.source),
                    "action": name,
                    "destinations": destinations,
                })
            }
            EdgeLabel::Timed(text) => return Err(Error::unsupported_label("JANI", text.clone())),
        };
        edges.push(edge);
    }

    let locations: Vec<Value> = (1..=graph.state_count)
        .map(|state| {
            let mut loc = json!({ "name": location(state) });
            if graph.label(state).is_some_and(|a| a.is_failed()) {
                loc["transient-values"] = json!([{ "ref": FAILED_VARIABLE, "value": true }]);
            }
            loc
        })
        .collect();

    let model_type = if actions.is_empty() { "ctmc" } else { "ma" };

    Ok(json!({
        "jani-version": JANI_VERSION,
        "name": model_name,
        "type": model_type,
        "actions": actions.iter().map(|a| json!({ "name": a })).collect::<Vec<_>>(),
        "constants": constants.iter().map(|c| json!({ "name": c, "type": "real" })).collect::<Vec<_>>(),
        "variables": [{
            "name": FAILED_VARIABLE,
            "type": "bool",
            "initial-value": false,
            "transient": true,
        }],
        "properties": [],
        "automata": [{
            "name": model_name,
            "locations": locations,
            "initial-locations": [location(graph.initial)],
            "edges": edges,
        }],
        "system": { "elements": [{ "automaton": model_name }] },
    }))
}

/// Write the JANI document for `graph`
pub fn write_jani<W: Write>(
    w: &mut W,
    graph: &ReducedGraph,
    model_name: &str,
    pretty: bool,
) -> Result<()> {
    let document = jani_document(graph, model_name)?;
    if pretty {
        serde_json::to_writer_pretty(&mut *w, &document)?;
    } else {
        serde_json::to_writer(&mut *w, &document)?;
    }
    writeln!(w)?; // Add trailing newline
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reduction::{Annotation, ReducedTransition};

    fn failed_loop() -> ReducedGraph {
        ReducedGraph {
            initial: 1,
            state_count: 1,
            transitions: vec![ReducedTransition {
                source: 1,
                label: EdgeLabel::Rate("3.0".into()),
                target: 1,
            }],
            labels: vec![Annotation::Failed],
        }
    }

    #[test]
    fn test_ctmc_document() {
        let doc = jani_document(&failed_loop(), "model").unwrap();

        assert_eq!(doc["type"], "ctmc");
        assert_eq!(doc["automata"][0]["initial-locations"][0], "s1");
        assert_eq!(doc["automata"][0]["edges"][0]["rate"]["exp"], 3.0);
        assert_eq!(
            doc["automata"][0]["locations"][0]["transient-values"][0]["ref"],
            "failed"
        );
        assert_eq!(doc["system"]["elements"][0]["automaton"], "model");
    }

    #[test]
    fn test_actions_make_a_markov_automaton() {
        let mut graph = failed_loop();
        graph.transitions.push(ReducedTransition {
            source: 1,
            label: EdgeLabel::Action("go".into()),
            target: 1,
        });
        graph.labels = vec![Annotation::Operational];

        let doc = jani_document(&graph, "m").unwrap();

        assert_eq!(doc["type"], "ma");
        assert_eq!(doc["actions"][0]["name"], "go");
        assert_eq!(doc["automata"][0]["edges"][1]["action"], "go");
        assert!(doc["automata"][0]["locations"][0].get("transient-values").is_none());
    }

    #[test]
    fn test_symbolic_rates_become_constants() {
        let mut graph = failed_loop();
        graph.transitions[0].label = EdgeLabel::Rate("lambda".into());

        let doc = jani_document(&graph, "m").unwrap();
        assert_eq!(doc["automata"][0]["edges"][0]["rate"]["exp"], "lambda");
        assert_eq!(doc["constants"][0]["name"], "lambda");

        graph.transitions[0].label = EdgeLabel::Rate("2 * lambda".into());
        assert!(matches!(
            jani_document(&graph, "m").unwrap_err(),
            Error::UnsupportedLabel { .. }
        ));
    }

    #[test]
    fn test_timed_edges_are_rejected() {
        let mut graph = failed_loop();
        graph.transitions[0].label = EdgeLabel::Timed("time 1".into());
        assert!(jani_document(&graph, "m").is_err());
    }

    #[test]
    fn test_write_jani() {
        let mut out = Vec::new();
        write_jani(&mut out, &failed_loop(), "m", false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["jani-version"], 1);
    }
}
