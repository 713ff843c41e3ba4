//! taskrank-core: task prioritization pipeline.
//!
//! raw records -> `normalize` -> `ScoringEngine::score` -> `RunResult`.
//! Every call is a pure function of its input, the strategy/weights and the
//! reference date; nothing is cached between calls.

pub mod coerce;
pub mod error;
pub mod graph;
pub mod normalize;
pub mod result;
pub mod scoring;
pub mod store;
pub mod strategy;
pub mod task;
pub mod time;

pub use error::{AnalysisError, AnalysisResult, StoreError};
pub use graph::{Cycle, DependencyGraph, detect_cycles};
pub use normalize::{Normalized, TaskWarningEntry, TaskWarnings, extract_batch, normalize};
pub use result::{AnalyzedTask, CycleReport, RunMeta, RunResult, ScoreBreakdown, Suggestion};
pub use scoring::ScoringEngine;
pub use store::{AnalysisStore, InMemoryStore, suggest};
pub use strategy::{Strategy, Weights};
pub use task::{NormalizedTask, Tier};

use chrono::NaiveDate;
use serde_json::Value;

/// Normalize and score a batch of raw task records.
pub fn analyze_records(
    records: &[Value],
    strategy: Strategy,
    custom_weights: Option<Weights>,
    today: NaiveDate,
) -> RunResult {
    let normalized = normalize(records);
    ScoringEngine::new(strategy, today)
        .with_custom_weights(custom_weights)
        .score(&normalized)
}

/// Like `analyze_records`, starting from a whole payload (bare array or
/// `{"tasks": [...]}`). Fails only when no task sequence can be found.
pub fn analyze_payload(
    payload: &Value,
    strategy: Strategy,
    custom_weights: Option<Weights>,
    today: NaiveDate,
) -> AnalysisResult<RunResult> {
    let records = extract_batch(payload)?;
    Ok(analyze_records(records, strategy, custom_weights, today))
}
