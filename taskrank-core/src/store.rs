//! Last-analysis store boundary.
//!
//! The latest `RunResult` is kept by an injected store rather than ambient
//! process state. Backends live with their callers (the CLI keeps a JSON
//! file); `InMemoryStore` serves tests and embedders.

use crate::error::StoreError;
use crate::result::{RunResult, Suggestion};

pub trait AnalysisStore {
    fn store_latest(&mut self, result: &RunResult) -> Result<(), StoreError>;

    /// `Ok(None)` until something has been stored.
    fn fetch_latest(&self) -> Result<Option<RunResult>, StoreError>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    latest: Option<RunResult>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AnalysisStore for InMemoryStore {
    fn store_latest(&mut self, result: &RunResult) -> Result<(), StoreError> {
        self.latest = Some(result.clone());
        Ok(())
    }

    fn fetch_latest(&self) -> Result<Option<RunResult>, StoreError> {
        Ok(self.latest.clone())
    }
}

/// Top tasks of the latest analysis plus its metadata.
pub fn suggest(store: &dyn AnalysisStore) -> Result<Suggestion, StoreError> {
    store
        .fetch_latest()?
        .map(|r| r.suggestion())
        .ok_or(StoreError::NoPriorAnalysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::scoring::ScoringEngine;
    use crate::strategy::Strategy;
    use chrono::NaiveDate;
    use serde_json::json;

    fn sample_result(n: usize) -> RunResult {
        let raw: Vec<_> = (0..n)
            .map(|i| json!({"id": format!("t{i}"), "importance": i + 1}))
            .collect();
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        ScoringEngine::new(Strategy::HighImpact, today).score(&normalize(&raw))
    }

    #[test]
    fn suggest_without_analysis_fails() {
        let store = InMemoryStore::new();
        assert!(matches!(suggest(&store), Err(StoreError::NoPriorAnalysis)));
    }

    #[test]
    fn suggest_returns_top_three_of_latest() {
        let mut store = InMemoryStore::new();
        store.store_latest(&sample_result(2)).unwrap();
        store.store_latest(&sample_result(5)).unwrap();

        let s = suggest(&store).unwrap();
        let ids: Vec<_> = s.suggested_tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["t4", "t3", "t2"]);
        assert_eq!(s.meta.strategy_used, Strategy::HighImpact);
    }

    #[test]
    fn suggest_with_fewer_than_three_tasks() {
        let mut store = InMemoryStore::new();
        store.store_latest(&sample_result(1)).unwrap();
        assert_eq!(suggest(&store).unwrap().suggested_tasks.len(), 1);
    }
}
