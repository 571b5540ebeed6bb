//! Core domain models and contracts for codescribe
//!
//! This crate contains the domain layer of the analysis stage:
//! - Domain: Unit, GraphContext, AnalysisRecord, MapResult, BatchResult
//! - Contracts: MapExecutor, DiagramValidator, run hooks and callbacks

pub mod contracts;
pub mod domain;

pub use contracts::*;
pub use domain::*;

/// Re-export common types
pub use anyhow::{Error, Result};
pub use serde::{Deserialize, Serialize};
