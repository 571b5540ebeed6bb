//! Recovery chain applied to a single unit's backend result
//!
//! The backend's pass/fail flag is advisory: its own JSON validation is
//! stricter than the tolerant extractor here, so raw text from a reported
//! failure often still contains a usable answer. The chain is an explicit
//! ordered list of strategies; each either produces a record, skips a
//! result shape it does not apply to, or records a parse failure and lets
//! the next strategy try.

use crate::parse::{parse_analysis_response, truncate_snippet, ParseError};
use codescribe_core::{AnalysisRecord, DiagramValidator, MapResult};
use serde_json::Value;
use tracing::{debug, info, warn};

const LOG_SNIPPET_CHARS: usize = 400;

/// Outcome of running the full chain over one result.
#[derive(Debug)]
pub enum Recovery {
    Recovered {
        record: AnalysisRecord,
        /// True when the record was parsed out of a result the backend
        /// reported as failed
        salvaged: bool,
    },
    Failed,
}

enum StepResult {
    Parsed(AnalysisRecord),
    /// The strategy does not apply to this result shape
    Skipped,
    Failed(ParseError),
}

struct RecoveryStep {
    name: &'static str,
    salvage: bool,
    run: fn(&MapResult, &str, &dyn DiagramValidator) -> StepResult,
}

/// Strict priority order: raw text first, structured output as fallback,
/// then the same pair again for results the backend reported as failed.
/// A reported failure without raw text is terminal; there is nothing to
/// recover from.
const RECOVERY_CHAIN: &[RecoveryStep] = &[
    RecoveryStep {
        name: "raw response",
        salvage: false,
        run: step_raw_on_success,
    },
    RecoveryStep {
        name: "structured output",
        salvage: false,
        run: step_output_on_success,
    },
    RecoveryStep {
        name: "raw response salvage",
        salvage: true,
        run: step_raw_on_failure,
    },
    RecoveryStep {
        name: "structured output salvage",
        salvage: true,
        run: step_output_on_failure,
    },
];

fn step_raw_on_success(
    result: &MapResult,
    expected: &str,
    validator: &dyn DiagramValidator,
) -> StepResult {
    if !result.success {
        return StepResult::Skipped;
    }
    let Some(raw) = &result.raw_response else {
        return StepResult::Skipped;
    };
    parse_step(raw, expected, validator)
}

fn step_output_on_success(
    result: &MapResult,
    expected: &str,
    validator: &dyn DiagramValidator,
) -> StepResult {
    if !result.success {
        return StepResult::Skipped;
    }
    let Some(output) = &result.output else {
        return StepResult::Skipped;
    };
    parse_step(&Value::Object(output.clone()).to_string(), expected, validator)
}

fn step_raw_on_failure(
    result: &MapResult,
    expected: &str,
    validator: &dyn DiagramValidator,
) -> StepResult {
    if result.success {
        return StepResult::Skipped;
    }
    let Some(raw) = &result.raw_response else {
        return StepResult::Skipped;
    };
    parse_step(raw, expected, validator)
}

fn step_output_on_failure(
    result: &MapResult,
    expected: &str,
    validator: &dyn DiagramValidator,
) -> StepResult {
    // Only reached as a last resort after raw-text salvage; a failure with
    // no raw text at all stays terminal.
    if result.success || result.raw_response.is_none() {
        return StepResult::Skipped;
    }
    let Some(output) = &result.output else {
        return StepResult::Skipped;
    };
    parse_step(&Value::Object(output.clone()).to_string(), expected, validator)
}

fn parse_step(text: &str, expected: &str, validator: &dyn DiagramValidator) -> StepResult {
    match parse_analysis_response(text, expected, validator) {
        Ok(record) => StepResult::Parsed(record),
        Err(err) => StepResult::Failed(err),
    }
}

/// Runs the chain over one result and classifies the unit.
pub fn recover_analysis(
    result: &MapResult,
    expected_unit_id: &str,
    validator: &dyn DiagramValidator,
) -> Recovery {
    let mut failures: Vec<(&'static str, ParseError)> = Vec::new();

    for step in RECOVERY_CHAIN {
        match (step.run)(result, expected_unit_id, validator) {
            StepResult::Parsed(record) => {
                if step.salvage {
                    info!(
                        "recovered analysis for '{}' via {} despite reported failure (executor error: {})",
                        expected_unit_id,
                        step.name,
                        result.error.as_deref().unwrap_or("none")
                    );
                }
                return Recovery::Recovered {
                    record,
                    salvaged: step.salvage,
                };
            }
            StepResult::Skipped => {}
            StepResult::Failed(err) => {
                debug!(
                    "{} parse failed for '{}': {}",
                    step.name, expected_unit_id, err
                );
                failures.push((step.name, err));
            }
        }
    }

    if failures.is_empty() {
        warn!(
            "unit '{}' has no recoverable content (executor error: {})",
            expected_unit_id,
            result.error.as_deref().unwrap_or("none")
        );
    } else {
        let detail = failures
            .iter()
            .map(|(name, err)| format!("{name}: {err}"))
            .collect::<Vec<_>>()
            .join("; ");
        warn!(
            "unit '{}' failed after {} parse attempts: {} (response: {})",
            expected_unit_id,
            failures.len(),
            detail,
            truncate_snippet(
                result.raw_response.as_deref().unwrap_or(""),
                LOG_SNIPPET_CHARS
            )
        );
    }
    Recovery::Failed
}
