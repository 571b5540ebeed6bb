//! Diagram cleaning and the built-in Mermaid header check

use codescribe_core::DiagramValidator;
use serde_json::Value;

const FLOW_DIRECTIONS: &[&str] = &["TD", "TB", "LR", "RL", "BT"];

const DIAGRAM_HEADERS: &[&str] = &[
    "sequenceDiagram",
    "classDiagram",
    "stateDiagram",
    "stateDiagram-v2",
    "erDiagram",
    "journey",
    "gantt",
    "pie",
    "mindmap",
    "timeline",
];

/// Checks that diagram source opens with a known Mermaid header.
///
/// Flowcharts additionally need a valid direction and at least one body
/// line. Full grammar checking belongs to the renderer; this guards against
/// the model answering with prose where a diagram was requested.
#[derive(Debug, Clone, Copy, Default)]
pub struct MermaidHeaderValidator;

impl DiagramValidator for MermaidHeaderValidator {
    fn validate(&self, source: &str) -> bool {
        let mut lines = source.lines().map(str::trim).filter(|l| !l.is_empty());
        let Some(header) = lines.next() else {
            return false;
        };
        let mut tokens = header.split_whitespace();
        let Some(keyword) = tokens.next() else {
            return false;
        };
        match keyword {
            "graph" | "flowchart" => {
                tokens.next().is_some_and(|d| FLOW_DIRECTIONS.contains(&d))
                    && lines.next().is_some()
            }
            _ => DIAGRAM_HEADERS.contains(&keyword),
        }
    }
}

/// Trims a raw `suggestedDiagram` value, unwraps one ```` ```mermaid ````
/// fence if present, and validates the result. Invalid or non-string input
/// yields an empty string, never an error.
pub fn clean_diagram(value: Option<&Value>, validator: &dyn DiagramValidator) -> String {
    let Some(Value::String(raw)) = value else {
        return String::new();
    };
    let body = strip_mermaid_fence(raw.trim());
    if validator.validate(body) {
        body.to_string()
    } else {
        String::new()
    }
}

fn strip_mermaid_fence(text: &str) -> &str {
    if let Some(rest) = text.strip_prefix("```mermaid") {
        if let Some(body) = rest.strip_suffix("```") {
            return body.trim();
        }
    }
    text
}
