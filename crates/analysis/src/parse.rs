//! Parsing a complete analysis record out of raw response text

use crate::diagram::clean_diagram;
use crate::extract::extract_json;
use crate::normalize::{
    ensure_string, normalize_code_example, normalize_dependencies, normalize_entries,
    normalize_key_concept, normalize_patterns, normalize_public_api_entry,
};
use codescribe_core::{AnalysisRecord, DiagramValidator};
use serde_json::Value;
use thiserror::Error;

/// Substituted when the response carries no usable overview.
pub const DEFAULT_OVERVIEW: &str = "No overview was provided for this module.";

const SNIPPET_CHARS: usize = 400;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no JSON found in response: {snippet}")]
    NoJsonFound { snippet: String },
    #[error("extracted JSON is not an object")]
    NotAnObject,
}

/// Builds a complete, defaulted [`AnalysisRecord`] from raw response text.
///
/// Fails only when no JSON can be located at all or the located value is
/// not an object; every field-level anomaly below that is defaulted or
/// dropped. An id field present in the response is trusted as-is, even when
/// it differs from `expected_unit_id`; the expected id only fills the gap.
pub fn parse_analysis_response(
    text: &str,
    expected_unit_id: &str,
    validator: &dyn DiagramValidator,
) -> Result<AnalysisRecord, ParseError> {
    let value = extract_json(text).ok_or_else(|| ParseError::NoJsonFound {
        snippet: truncate_snippet(text, SNIPPET_CHARS),
    })?;
    let obj = value.as_object().ok_or(ParseError::NotAnObject)?;

    let id = obj
        .get("moduleId")
        .or_else(|| obj.get("id"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| expected_unit_id.to_string());

    Ok(AnalysisRecord {
        id,
        overview: ensure_string(obj.get("overview"), DEFAULT_OVERVIEW),
        key_concepts: normalize_entries(obj.get("keyConcepts"), normalize_key_concept),
        public_api: normalize_entries(obj.get("publicAPI"), normalize_public_api_entry),
        internal_architecture: ensure_string(obj.get("internalArchitecture"), ""),
        data_flow: ensure_string(obj.get("dataFlow"), ""),
        error_handling: ensure_string(obj.get("errorHandling"), ""),
        patterns: normalize_patterns(obj.get("patterns")),
        code_examples: normalize_entries(obj.get("codeExamples"), normalize_code_example),
        dependencies: normalize_dependencies(obj.get("dependencies")),
        suggested_diagram: clean_diagram(obj.get("suggestedDiagram"), validator),
    })
}

/// Char-boundary-safe prefix for log and error messages.
pub(crate) fn truncate_snippet(text: &str, max_chars: usize) -> String {
    let mut snippet: String = text.chars().take(max_chars).collect();
    if text.chars().nth(max_chars).is_some() {
        snippet.push_str("...");
    }
    snippet
}
