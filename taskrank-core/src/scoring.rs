//! Scoring engine: sub-scores, weighted blend, tiers, explanations, ranking.
//!
//! Factors (each in [0, 1] when blended):
//! - urgency: 0 without a due date; linear decay over a 60-day horizon for
//!   future dates; 1.0 plus an overdue boost (saturating at 30 days) for past
//!   dates. The boost can reach 2.0 but is clamped to 1.0 when blending.
//! - importance: importance / 10.
//! - effort: 1 / (1 + hours), min-max scaled across the batch (0.5 for all
//!   when the range collapses).
//! - dependencies: out-degree, min-max scaled across the batch (0.0 for all
//!   when the range collapses).
//!
//! Ranking: score DESC, importance DESC, estimated hours ASC, then input
//! order.

use crate::graph::{Cycle, DependencyGraph};
use crate::normalize::Normalized;
use crate::result::{AnalyzedTask, CycleReport, RunMeta, RunResult, ScoreBreakdown};
use crate::strategy::{Strategy, Weights, resolve_weights, round_to};
use crate::task::{NormalizedTask, Tier};
use crate::time::days_until;
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

const OVERDUE_BOOST_DAYS: i64 = 30;
const URGENCY_HORIZON_DAYS: f64 = 60.0;
const RANGE_EPSILON: f64 = 1e-9;
const EFFORT_COLLAPSED: f64 = 0.5;
const DEPENDENCIES_COLLAPSED: f64 = 0.0;
const URGENT_WITHIN_DAYS: i64 = 3;
const QUICK_WIN_HOURS: f64 = 2.0;
const HIGH_IMPORTANCE: i64 = 8;
const OUTPUT_PLACES: i32 = 4;

/// Urgency before the blend-time clamp, in [0, 2].
pub fn urgency_raw(due: Option<NaiveDate>, today: NaiveDate) -> f64 {
    let Some(due) = due else { return 0.0 };
    let days = days_until(due, today);
    if days < 0 {
        1.0 + (-days).min(OVERDUE_BOOST_DAYS) as f64 / OVERDUE_BOOST_DAYS as f64
    } else {
        (1.0 - days as f64 / URGENCY_HORIZON_DAYS).clamp(0.0, 1.0)
    }
}

/// Shorter tasks score higher.
pub fn effort_raw(hours: f64) -> f64 {
    1.0 / (1.0 + hours)
}

/// Min-max scale to [0, 1]; every value becomes `collapsed` when the range
/// is degenerate.
fn min_max_scale(values: &[f64], collapsed: f64) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if values.is_empty() || max - min < RANGE_EPSILON {
        return vec![collapsed; values.len()];
    }
    values.iter().map(|v| (v - min) / (max - min)).collect()
}

/// Human-readable reasons, joined by "; ".
///
/// "Blocks N task(s)" is shown when the task itself lists dependencies, but N
/// is the number of tasks that depend on it.
pub fn explain(task: &NormalizedTask, today: NaiveDate, blocks: usize) -> String {
    let mut reasons = Vec::new();

    let due_clause = match task.due_date.map(|d| days_until(d, today)) {
        Some(days) if days < 0 => format!("Past due by {} day(s) → urgency boosted", -days),
        Some(days) if days <= URGENT_WITHIN_DAYS => format!("Due in {days} day(s) → urgent"),
        Some(days) => format!("Due in {days} day(s)"),
        None => "No due date".to_string(),
    };
    reasons.push(due_clause);

    if !task.dependencies.is_empty() {
        reasons.push(format!("Blocks {blocks} task(s)"));
    }
    if task.estimated_hours <= QUICK_WIN_HOURS {
        reasons.push("Quick win (low estimated hours)".to_string());
    }
    if task.importance >= HIGH_IMPORTANCE {
        reasons.push("High importance".to_string());
    }

    reasons.join("; ")
}

fn cycle_warning(cycle_ids: &[usize]) -> Option<String> {
    match cycle_ids {
        [] => None,
        [only] => Some(format!("Task is part of a circular dependency (cycle #{only}).")),
        many => {
            let list: Vec<String> = many.iter().map(ToString::to_string).collect();
            Some(format!(
                "Task is part of multiple circular dependencies (cycles {}).",
                list.join(", ")
            ))
        }
    }
}

/// Blends normalized tasks into a ranked `RunResult`.
///
/// Pure: the same input, strategy, weights and `today` always produce the
/// same result.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    strategy: Strategy,
    weights: Weights,
    today: NaiveDate,
}

impl ScoringEngine {
    pub fn new(strategy: Strategy, today: NaiveDate) -> Self {
        Self {
            strategy,
            weights: resolve_weights(strategy, None),
            today,
        }
    }

    pub fn with_custom_weights(mut self, custom: Option<Weights>) -> Self {
        self.weights = resolve_weights(self.strategy, custom);
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Weights actually applied (sum to 1).
    pub fn weights(&self) -> Weights {
        self.weights
    }

    pub fn score(&self, normalized: &Normalized) -> RunResult {
        let tasks = &normalized.tasks;
        let graph = DependencyGraph::build(tasks);
        let cycles = graph.find_cycles();

        let effort_inputs: Vec<f64> = tasks.iter().map(|t| effort_raw(t.estimated_hours)).collect();
        let effort_scores = min_max_scale(&effort_inputs, EFFORT_COLLAPSED);

        let out_degrees: Vec<usize> = tasks.iter().map(|t| graph.out_degree(&t.id)).collect();
        let degree_values: Vec<f64> = out_degrees.iter().map(|&d| d as f64).collect();
        let dependency_scores = min_max_scale(&degree_values, DEPENDENCIES_COLLAPSED);

        let memberships = cycle_memberships(&cycles);
        let w = self.weights;

        let mut analyzed: Vec<AnalyzedTask> = tasks
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let urgency = urgency_raw(t.due_date, self.today).min(1.0);
                let importance = t.importance as f64 / 10.0;
                let effort = effort_scores[i].min(1.0);
                let dependencies = dependency_scores[i].min(1.0);

                let score = w.urgency * urgency
                    + w.importance * importance
                    + w.dependencies * dependencies
                    + w.effort * effort;

                let mut warnings = Vec::new();
                let in_cycles = memberships
                    .get(t.id.as_str())
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                warnings.extend(cycle_warning(in_cycles));
                warnings.extend(normalized.warnings.get(&t.id).iter().cloned());

                AnalyzedTask {
                    id: t.id.clone(),
                    title: t.title.clone(),
                    due_date: t.raw_due_date.clone(),
                    estimated_hours: t.estimated_hours,
                    importance: t.importance,
                    dependencies: t.dependencies.clone(),
                    score: round_to(score, OUTPUT_PLACES),
                    tier: Tier::from_score(score),
                    score_breakdown: ScoreBreakdown {
                        urgency: round_to(urgency, OUTPUT_PLACES),
                        importance: round_to(importance, OUTPUT_PLACES),
                        effort: round_to(effort, OUTPUT_PLACES),
                        dependencies: round_to(dependencies, OUTPUT_PLACES),
                        weights: w.rounded(OUTPUT_PLACES),
                    },
                    explanation: explain(t, self.today, out_degrees[i]),
                    warnings,
                }
            })
            .collect();

        // stable: exact ties keep input order
        analyzed.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| b.importance.cmp(&a.importance))
                .then_with(|| a.estimated_hours.total_cmp(&b.estimated_hours))
        });

        debug!(
            tasks = analyzed.len(),
            cycles = cycles.len(),
            strategy = %self.strategy,
            "scored task batch"
        );

        let warnings_summary =
            (!normalized.warnings.is_empty()).then(|| normalized.warnings.entries().to_vec());

        RunResult {
            analyzed_tasks: analyzed,
            meta: RunMeta {
                cycles: cycles.iter().cloned().map(CycleReport::from).collect(),
                strategy_used: self.strategy,
                warnings_summary,
            },
        }
    }
}

/// task id -> ids of the cycles it belongs to, in discovery order.
fn cycle_memberships(cycles: &[Cycle]) -> HashMap<&str, Vec<usize>> {
    let mut out: HashMap<&str, Vec<usize>> = HashMap::new();
    for c in cycles {
        for id in &c.tasks {
            out.entry(id.as_str()).or_default().push(c.cycle_id);
        }
    }
    out
}
