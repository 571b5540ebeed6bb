//! Contracts between the analysis stage and its collaborators

use crate::*;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Identifies the shared prompt template for a batch and the output fields
/// the backend is asked to produce for every unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapSpec {
    pub template: String,
    pub output_fields: Vec<String>,
}

impl MapSpec {
    /// Template spec for per-unit analysis records.
    pub fn unit_analysis() -> Self {
        Self {
            template: "unit-analysis".to_string(),
            output_fields: [
                "moduleId",
                "overview",
                "keyConcepts",
                "publicAPI",
                "internalArchitecture",
                "dataFlow",
                "errorHandling",
                "patterns",
                "codeExamples",
                "dependencies",
                "suggestedDiagram",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Monotonically increasing counters reported by the backend while a batch
/// is in flight. Opaque to the analysis stage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MapProgress {
    pub completed: usize,
    pub total: usize,
}

pub type ProgressCallback = Arc<dyn Fn(MapProgress) + Send + Sync>;

/// Per-batch execution options forwarded to the backend.
#[derive(Clone)]
pub struct MapOptions {
    pub concurrency: usize,
    pub timeout: Duration,
    pub model: Option<String>,
    /// Passed through to the backend unmodified
    pub progress: Option<ProgressCallback>,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            timeout: Duration::from_secs(120),
            model: None,
            progress: None,
        }
    }
}

impl fmt::Debug for MapOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapOptions")
            .field("concurrency", &self.concurrency)
            .field("timeout", &self.timeout)
            .field("model", &self.model)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

/// Bounded-concurrency execution backend.
///
/// Returns one [`MapOutcome`] per input, correlated back to its unit via the
/// identifier field embedded in the prompt input. Scheduling, backpressure
/// and transport retries are internal to the implementation; an error from
/// this call is the only error that escapes the orchestrator.
#[async_trait]
pub trait MapExecutor: Send + Sync {
    async fn execute_batch(
        &self,
        inputs: Vec<PromptInput>,
        spec: &MapSpec,
        options: &MapOptions,
    ) -> Result<Vec<MapOutcome>>;
}

/// Syntactic well-formedness check for diagram source in the target diagram
/// grammar.
pub trait DiagramValidator: Send + Sync {
    fn validate(&self, source: &str) -> bool;
}

/// Invoked once per unit per round, after that unit's [`MapResult`] is
/// available and regardless of its outcome. A unit retried in a later round
/// triggers the hook again.
pub type UnitCompletionHook = Arc<dyn Fn(&Unit, &MapResult) + Send + Sync>;

/// Caller-supplied observation points for one orchestrated run.
#[derive(Clone, Default)]
pub struct RunHooks {
    /// Polled between retry rounds only; an in-flight round is not interrupted
    pub cancellation: Option<CancellationToken>,
    pub progress: Option<ProgressCallback>,
    pub on_unit_complete: Option<UnitCompletionHook>,
}

impl RunHooks {
    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}

impl fmt::Debug for RunHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunHooks")
            .field("cancellation", &self.cancellation.is_some())
            .field("progress", &self.progress.is_some())
            .field("on_unit_complete", &self.on_unit_complete.is_some())
            .finish()
    }
}
