//! Canonical task model produced by the normalizer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_IMPORTANCE: i64 = 5;
pub const MIN_IMPORTANCE: i64 = 1;
pub const MAX_IMPORTANCE: i64 = 10;
pub const DEFAULT_ESTIMATED_HOURS: f64 = 2.0;

/// Coarse priority bucket derived from the blended score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    High,
    Medium,
    Low,
}

impl Tier {
    pub const HIGH_THRESHOLD: f64 = 0.75;
    pub const MEDIUM_THRESHOLD: f64 = 0.45;

    pub fn from_score(score: f64) -> Self {
        if score >= Self::HIGH_THRESHOLD {
            Tier::High
        } else if score >= Self::MEDIUM_THRESHOLD {
            Tier::Medium
        } else {
            Tier::Low
        }
    }
}

/// A task after validation and coercion.
///
/// Invariants: `importance` is within 1..=10, `estimated_hours` is finite
/// and non-negative. Scoring never looks at raw input again.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTask {
    pub id: String,
    pub title: String,
    pub importance: i64,
    pub estimated_hours: f64,
    pub due_date: Option<NaiveDate>,

    /// Prerequisite ids in input order; duplicates and unknown ids are kept.
    pub dependencies: Vec<String>,

    /// `due_date` exactly as received (echoed in output).
    pub raw_due_date: Value,

    /// `estimated_hours` exactly as received.
    pub raw_estimated_hours: Value,
}

impl NormalizedTask {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            importance: DEFAULT_IMPORTANCE,
            estimated_hours: DEFAULT_ESTIMATED_HOURS,
            due_date: None,
            dependencies: Vec::new(),
            raw_due_date: Value::Null,
            raw_estimated_hours: Value::Null,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_importance(mut self, importance: i64) -> Self {
        self.importance = importance.clamp(MIN_IMPORTANCE, MAX_IMPORTANCE);
        self
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = hours;
        self.raw_estimated_hours = serde_json::json!(hours);
        self
    }

    pub fn with_due_date(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self.raw_due_date = Value::String(due.format("%Y-%m-%d").to_string());
        self
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }
}
