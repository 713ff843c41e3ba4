//! Output types: analyzed tasks and run metadata.

use crate::graph::Cycle;
use crate::normalize::TaskWarningEntry;
use crate::strategy::{Strategy, Weights};
use crate::task::Tier;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CYCLE_MESSAGE: &str = "circular dependency detected";

/// Sub-scores as blended (each in [0, 1]) plus the weights applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub urgency: f64,
    pub importance: f64,
    pub effort: f64,
    pub dependencies: f64,
    pub weights: Weights,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedTask {
    pub id: String,
    pub title: String,
    /// Raw due date as received.
    pub due_date: Value,
    pub estimated_hours: f64,
    pub importance: i64,
    pub dependencies: Vec<String>,
    pub score: f64,
    pub tier: Tier,
    pub score_breakdown: ScoreBreakdown,
    pub explanation: String,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycle_id: usize,
    pub tasks: Vec<String>,
    pub message: String,
}

impl From<Cycle> for CycleReport {
    fn from(c: Cycle) -> Self {
        Self {
            cycle_id: c.cycle_id,
            tasks: c.tasks,
            message: CYCLE_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMeta {
    pub cycles: Vec<CycleReport>,
    pub strategy_used: Strategy,
    /// Normalization warnings per task; absent when there are none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warnings_summary: Option<Vec<TaskWarningEntry>>,
}

/// Ranked tasks, best first, plus run metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub analyzed_tasks: Vec<AnalyzedTask>,
    pub meta: RunMeta,
}

pub const SUGGESTION_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub suggested_tasks: Vec<AnalyzedTask>,
    pub meta: RunMeta,
}

impl RunResult {
    /// The top `SUGGESTION_COUNT` tasks with this run's metadata.
    pub fn suggestion(&self) -> Suggestion {
        Suggestion {
            suggested_tasks: self
                .analyzed_tasks
                .iter()
                .take(SUGGESTION_COUNT)
                .cloned()
                .collect(),
            meta: self.meta.clone(),
        }
    }
}
