//! One execution round: convert, delegate, classify

use crate::convert::{unit_prompt_input, UNIT_ID_KEY};
use crate::recovery::{recover_analysis, Recovery};
use anyhow::Result;
use codescribe_core::{
    AnalysisRecord, DiagramValidator, GraphContext, MapExecutor, MapOptions, MapSpec, PromptInput,
    RunHooks, Unit,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Collaborators and settings shared by every round of a run.
pub struct RoundDeps<'a> {
    pub executor: &'a dyn MapExecutor,
    pub validator: &'a dyn DiagramValidator,
    pub spec: &'a MapSpec,
    pub options: &'a MapOptions,
    pub hooks: &'a RunHooks,
}

/// Partition of one round's units; every submitted unit id lands on exactly
/// one side.
#[derive(Debug, Default)]
pub struct RoundOutcome {
    pub analyses: Vec<AnalysisRecord>,
    pub failed_unit_ids: Vec<String>,
}

/// Submits one round of units to the backend and classifies every result
/// through the recovery chain.
///
/// An executor that yields no results at all marks the whole round failed
/// without attempting recovery. Units the backend never answered for are
/// failed as well, so the partition stays exhaustive. Only a hard failure
/// of the executor call itself propagates as an error.
pub async fn run_round(
    units: &[Unit],
    context: &GraphContext,
    deps: &RoundDeps<'_>,
) -> Result<RoundOutcome> {
    let inputs: Vec<PromptInput> = units
        .iter()
        .map(|unit| unit_prompt_input(unit, context))
        .collect();

    debug!(
        "submitting round of {} units (concurrency {})",
        units.len(),
        deps.options.concurrency
    );
    let outcomes = deps
        .executor
        .execute_batch(inputs, deps.spec, deps.options)
        .await?;

    let mut round = RoundOutcome::default();
    if outcomes.is_empty() {
        warn!(
            "executor returned no results, marking all {} units failed",
            units.len()
        );
        round.failed_unit_ids = units.iter().map(|unit| unit.id.clone()).collect();
        return Ok(round);
    }

    let by_id: HashMap<&str, &Unit> = units.iter().map(|unit| (unit.id.as_str(), unit)).collect();
    let mut seen: HashSet<String> = HashSet::new();

    for outcome in &outcomes {
        let Some(unit_id) = outcome.input.get(UNIT_ID_KEY) else {
            warn!("discarding result without a '{}' key", UNIT_ID_KEY);
            continue;
        };
        let Some(unit) = by_id.get(unit_id.as_str()).copied() else {
            warn!("discarding result for unknown unit '{}'", unit_id);
            continue;
        };
        if !seen.insert(unit_id.clone()) {
            warn!("discarding duplicate result for unit '{}'", unit_id);
            continue;
        }

        if let Some(hook) = &deps.hooks.on_unit_complete {
            hook(unit, &outcome.result);
        }

        match recover_analysis(&outcome.result, &unit.id, deps.validator) {
            Recovery::Recovered { record, .. } => round.analyses.push(record),
            Recovery::Failed => round.failed_unit_ids.push(unit.id.clone()),
        }
    }

    for unit in units {
        if !seen.contains(unit.id.as_str()) {
            warn!("no result returned for unit '{}', marking failed", unit.id);
            round.failed_unit_ids.push(unit.id.clone());
        }
    }

    Ok(round)
}
