//! Round-based retry orchestration

use crate::round::{run_round, RoundDeps};
use anyhow::Result;
use codescribe_core::{
    BatchResult, DiagramValidator, GraphContext, MapExecutor, MapOptions, MapSpec, RunHooks, Unit,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Tuning for one orchestrated batch.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Retry rounds after the initial one; each re-submits only the units
    /// that are still failed
    pub retry_attempts: u32,
    pub concurrency: usize,
    pub timeout: Duration,
    pub model: Option<String>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            retry_attempts: 2,
            concurrency: 4,
            timeout: Duration::from_secs(120),
            model: None,
        }
    }
}

impl AnalysisOptions {
    /// Low-pressure settings for rate-limited backends.
    pub fn conservative() -> Self {
        Self {
            retry_attempts: 1,
            concurrency: 2,
            timeout: Duration::from_secs(180),
            model: None,
        }
    }

    /// High-throughput settings for large graphs.
    pub fn aggressive() -> Self {
        Self {
            retry_attempts: 3,
            concurrency: 8,
            timeout: Duration::from_secs(90),
            model: None,
        }
    }

    pub fn with_retry_attempts(mut self, retry_attempts: u32) -> Self {
        self.retry_attempts = retry_attempts;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Drives a batch of units through the backend with cross-round retry of
/// the failed subset.
///
/// Owns its collaborators and per-run state explicitly; per-unit parse
/// failures surface as `failed_unit_ids`, never as errors. Rounds run
/// strictly sequentially; already-succeeded units are never re-submitted.
pub struct AnalysisOrchestrator {
    executor: Arc<dyn MapExecutor>,
    validator: Arc<dyn DiagramValidator>,
    options: AnalysisOptions,
    spec: MapSpec,
}

impl AnalysisOrchestrator {
    pub fn new(
        executor: Arc<dyn MapExecutor>,
        validator: Arc<dyn DiagramValidator>,
        options: AnalysisOptions,
    ) -> Self {
        Self {
            executor,
            validator,
            options,
            spec: MapSpec::unit_analysis(),
        }
    }

    /// Replaces the default template spec.
    pub fn with_spec(mut self, spec: MapSpec) -> Self {
        self.spec = spec;
        self
    }

    pub async fn run(&self, units: &[Unit], context: &GraphContext) -> Result<BatchResult> {
        self.run_with_hooks(units, context, &RunHooks::default())
            .await
    }

    pub async fn run_with_hooks(
        &self,
        units: &[Unit],
        context: &GraphContext,
        hooks: &RunHooks,
    ) -> Result<BatchResult> {
        if units.is_empty() {
            return Ok(BatchResult {
                analyses: Vec::new(),
                failed_unit_ids: Vec::new(),
                duration: Duration::ZERO,
            });
        }

        let started = Instant::now();
        let map_options = MapOptions {
            concurrency: self.options.concurrency,
            timeout: self.options.timeout,
            model: self.options.model.clone(),
            progress: hooks.progress.clone(),
        };
        let deps = RoundDeps {
            executor: self.executor.as_ref(),
            validator: self.validator.as_ref(),
            spec: &self.spec,
            options: &map_options,
            hooks,
        };

        let outcome = run_round(units, context, &deps).await?;
        let mut analyses = outcome.analyses;
        let mut remaining_failed = outcome.failed_unit_ids;
        info!(
            "analysis round complete: {} succeeded, {} failed",
            analyses.len(),
            remaining_failed.len()
        );

        for attempt in 1..=self.options.retry_attempts {
            if remaining_failed.is_empty() {
                break;
            }
            if hooks.is_cancelled() {
                info!(
                    "cancellation observed before retry {}, keeping {} failures",
                    attempt,
                    remaining_failed.len()
                );
                break;
            }

            let failed_ids: HashSet<&str> =
                remaining_failed.iter().map(String::as_str).collect();
            let retry_units: Vec<Unit> = units
                .iter()
                .filter(|unit| failed_ids.contains(unit.id.as_str()))
                .cloned()
                .collect();
            if retry_units.is_empty() {
                break;
            }

            debug!(
                "retry round {}/{} over {} units",
                attempt,
                self.options.retry_attempts,
                retry_units.len()
            );
            let retry_outcome = run_round(&retry_units, context, &deps).await?;
            info!(
                "retry round {} complete: {} recovered, {} still failing",
                attempt,
                retry_outcome.analyses.len(),
                retry_outcome.failed_unit_ids.len()
            );
            analyses.extend(retry_outcome.analyses);
            remaining_failed = retry_outcome.failed_unit_ids;
        }

        let duration = started.elapsed();
        if remaining_failed.is_empty() {
            info!(
                "analysis batch complete: {} analyses in {:?}",
                analyses.len(),
                duration
            );
        } else {
            warn!(
                "analysis batch complete with failures: {} analyses, {} failed in {:?}",
                analyses.len(),
                remaining_failed.len(),
                duration
            );
        }

        Ok(BatchResult {
            analyses,
            failed_unit_ids: remaining_failed,
            duration,
        })
    }
}
