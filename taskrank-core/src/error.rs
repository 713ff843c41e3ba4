//! Error types for the ranking pipeline.
//!
//! Malformed task fields are never errors: the normalizer coerces them and
//! records a warning against the task. Only a payload that is not a task
//! sequence at all is rejected.

use thiserror::Error;

/// Caller contract violations when handing a batch to the pipeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("tasks must be a list (got {found})")]
    NotASequence { found: &'static str },
}

/// Outcomes of the last-analysis store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no prior analysis: run an analysis first")]
    NoPriorAnalysis,

    #[error("analysis store failed: {0}")]
    Backend(String),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
