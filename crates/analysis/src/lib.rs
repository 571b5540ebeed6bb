//! Batch AI analysis for codescribe
//!
//! Turns a set of code components into structured analysis records by
//! driving a prompt backend in bounded-concurrency rounds and salvaging
//! whatever the backend returns:
//!
//! 1. **Convert**: flatten each unit plus graph context into a prompt input
//! 2. **Execute**: delegate one round to the
//!    [`MapExecutor`](codescribe_core::MapExecutor) backend
//! 3. **Recover**: classify every per-unit result through an ordered chain
//!    of parse strategies before declaring it failed
//! 4. **Retry**: re-submit only the still-failed units for a bounded number
//!    of further rounds
//!
//! Per-unit parse failures never abort the batch; the final
//! [`BatchResult`](codescribe_core::BatchResult) partitions every input id
//! into an analysis or a failed-id entry.

pub mod convert;
pub mod diagram;
pub mod extract;
pub mod normalize;
pub mod orchestrator;
pub mod parse;
pub mod recovery;
pub mod round;

pub use convert::{unit_prompt_input, UNIT_ID_KEY};
pub use diagram::{clean_diagram, MermaidHeaderValidator};
pub use extract::extract_json;
pub use orchestrator::{AnalysisOptions, AnalysisOrchestrator};
pub use parse::{parse_analysis_response, ParseError};
pub use recovery::{recover_analysis, Recovery};
pub use round::{run_round, RoundDeps, RoundOutcome};
