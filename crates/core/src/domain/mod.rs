//! Domain models for the codescribe analysis stage

use crate::*;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// A single independently analyzable code component.
///
/// Owned by the caller and read-only to the analysis stage; one `Unit`
/// produces exactly one [`AnalysisRecord`] or one failed-id entry per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    /// Stable identifier used for result correlation and retry bookkeeping
    pub id: String,
    pub name: String,
    pub path: String,
    /// Free-text description of what the component is for
    pub purpose: String,
    #[serde(default)]
    pub key_files: Vec<String>,
    /// Ids of units this unit depends on
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Ids of units depending on this unit
    #[serde(default)]
    pub dependents: Vec<String>,
    pub complexity: Complexity,
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => f.write_str("low"),
            Self::Medium => f.write_str("medium"),
            Self::High => f.write_str("high"),
        }
    }
}

/// Graph-level context shared by every unit in a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphContext {
    pub project_name: String,
    pub architecture_notes: Option<String>,
}

/// Flat string-keyed input handed to the prompt backend, one per unit per
/// round. List fields are pre-joined; no structure survives past this point.
pub type PromptInput = HashMap<String, String>;

/// Per-unit outcome reported by the execution backend.
///
/// The success flag is advisory: raw text frequently contains a usable
/// answer even when the backend's own validation rejected it. Any
/// combination of fields must be tolerated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapResult {
    pub success: bool,
    pub raw_response: Option<String>,
    /// Best-effort structured fields extracted by the backend itself
    pub output: Option<serde_json::Map<String, serde_json::Value>>,
    pub error: Option<String>,
}

/// One per-input result from the execution backend, echoing the prompt
/// input it belongs to so the caller can correlate by unit id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapOutcome {
    pub input: PromptInput,
    pub result: MapResult,
}

/// Normalized, defaulted analysis produced for a successfully parsed unit.
///
/// Every list-of-object field contains only entries whose required key was
/// present and string-typed in the source; all other fields carry a
/// deterministic default. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: String,
    pub overview: String,
    pub key_concepts: Vec<KeyConcept>,
    #[serde(rename = "publicAPI")]
    pub public_api: Vec<PublicApiEntry>,
    pub internal_architecture: String,
    pub data_flow: String,
    pub error_handling: String,
    pub patterns: Vec<String>,
    pub code_examples: Vec<CodeExample>,
    pub dependencies: DependencyInfo,
    /// Validated diagram source, or empty when absent or rejected
    pub suggested_diagram: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyConcept {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_ref: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicApiEntry {
    pub name: String,
    pub signature: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeExample {
    pub title: String,
    pub code: String,
    /// Normalized relative path (forward slashes, no leading `./` or `/`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<LineRange>,
}

/// Inclusive line range; invariant `end >= start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencyInfo {
    pub internal: Vec<InternalDependency>,
    pub external: Vec<ExternalDependency>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InternalDependency {
    pub module: String,
    pub usage: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalDependency {
    pub package: String,
    pub usage: String,
}

/// Final result of one orchestrated batch.
///
/// Every input unit id lands on exactly one side: an analysis produced from
/// its result, or membership in `failed_unit_ids`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub analyses: Vec<AnalysisRecord>,
    pub failed_unit_ids: Vec<String>,
    pub duration: Duration,
}
