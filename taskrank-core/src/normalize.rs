//! Normalizer: raw task records -> `NormalizedTask`s plus a warning trail.
//!
//! Every field is read independently and every correction is reported
//! against the task it happened to, naming the original value and the value
//! that replaced it. Nothing here fails; see `extract_batch` for the one
//! shape check that can.

use crate::coerce::{
    ListCoercion, coerce_float, coerce_int, coerce_list, coerce_string, display_raw, json_kind,
};
use crate::error::{AnalysisError, AnalysisResult};
use crate::task::{
    DEFAULT_ESTIMATED_HOURS, DEFAULT_IMPORTANCE, MAX_IMPORTANCE, MIN_IMPORTANCE, NormalizedTask,
};
use crate::time::parse_due_date;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

/// Warnings collected for one task id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskWarningEntry {
    pub task_id: String,
    pub warnings: Vec<String>,
}

/// Ordered task id -> warnings map. Ids appear in the order they first
/// received a warning; messages keep the order they were raised in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskWarnings {
    entries: Vec<TaskWarningEntry>,
}

impl TaskWarnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, task_id: &str, message: impl Into<String>) {
        let message = message.into();
        match self.entries.iter_mut().find(|e| e.task_id == task_id) {
            Some(entry) => entry.warnings.push(message),
            None => self.entries.push(TaskWarningEntry {
                task_id: task_id.to_string(),
                warnings: vec![message],
            }),
        }
    }

    pub fn get(&self, task_id: &str) -> &[String] {
        self.entries
            .iter()
            .find(|e| e.task_id == task_id)
            .map(|e| e.warnings.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[TaskWarningEntry] {
        &self.entries
    }
}

/// Output of the normalizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub tasks: Vec<NormalizedTask>,
    pub warnings: TaskWarnings,
}

/// Pull the task sequence out of a payload: either a bare array or an
/// object whose `tasks` member is an array.
pub fn extract_batch(payload: &Value) -> AnalysisResult<&[Value]> {
    match payload {
        Value::Array(items) => Ok(items),
        Value::Object(map) => match map.get("tasks") {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(AnalysisError::NotASequence { found: json_kind(other) }),
            None => Err(AnalysisError::NotASequence { found: "object" }),
        },
        other => Err(AnalysisError::NotASequence { found: json_kind(other) }),
    }
}

/// Normalize a batch of raw records, preserving order.
pub fn normalize(records: &[Value]) -> Normalized {
    let mut warnings = TaskWarnings::new();
    let tasks: Vec<NormalizedTask> = records
        .iter()
        .enumerate()
        .map(|(i, raw)| normalize_record(i, raw, &mut warnings))
        .collect();

    check_dependency_refs(&tasks, &mut warnings);

    debug!(
        tasks = tasks.len(),
        warned_tasks = warnings.len(),
        "normalized task batch"
    );

    Normalized { tasks, warnings }
}

fn normalize_record(index: usize, raw: &Value, warnings: &mut TaskWarnings) -> NormalizedTask {
    // a null id or title is the same as a missing one
    let field = |name: &str| raw.get(name).filter(|v| !v.is_null());

    let id = field("id")
        .and_then(coerce_string)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| format!("t{}", index + 1));

    if !raw.is_object() {
        warnings.push(
            &id,
            format!("task record '{}' is not an object and was treated as empty", display_raw(raw)),
        );
    }

    let title = field("title").map(display_raw).unwrap_or_else(|| id.clone());

    let (importance, note) = resolve_importance(raw.get("importance"));
    if let Some(note) = note {
        warnings.push(&id, note);
    }

    let (estimated_hours, note) = resolve_hours(raw.get("estimated_hours"));
    if let Some(note) = note {
        warnings.push(&id, note);
    }

    let (dependencies, note) = resolve_dependencies(raw.get("dependencies"));
    if let Some(note) = note {
        warnings.push(&id, note);
    }

    let raw_due_date = raw.get("due_date").cloned().unwrap_or(Value::Null);
    let due_date = raw_due_date.as_str().and_then(parse_due_date);

    NormalizedTask {
        id,
        title,
        importance,
        estimated_hours,
        due_date,
        dependencies,
        raw_due_date,
        raw_estimated_hours: raw.get("estimated_hours").cloned().unwrap_or(Value::Null),
    }
}

/// Importance: integer, clamped to 1..=10, default 5. Only an absent field
/// defaults silently; an explicit `null` is invalid like any other value.
pub fn resolve_importance(raw: Option<&Value>) -> (i64, Option<String>) {
    let Some(raw) = raw else {
        return (DEFAULT_IMPORTANCE, None);
    };

    match coerce_int(raw) {
        Some(v) => {
            let clamped = v.clamp(MIN_IMPORTANCE, MAX_IMPORTANCE);
            let note = (clamped != v).then(|| {
                format!("importance value '{}' normalized to {}", display_raw(raw), clamped)
            });
            (clamped, note)
        }
        None => (
            DEFAULT_IMPORTANCE,
            Some(format!(
                "importance value '{}' is invalid and defaulted to {}",
                display_raw(raw),
                DEFAULT_IMPORTANCE
            )),
        ),
    }
}

/// Estimated hours: finite float >= 0, default 2.0.
pub fn resolve_hours(raw: Option<&Value>) -> (f64, Option<String>) {
    let Some(raw) = raw else {
        return (DEFAULT_ESTIMATED_HOURS, None);
    };

    match coerce_float(raw) {
        Some(h) if h < 0.0 => (
            DEFAULT_ESTIMATED_HOURS,
            Some(format!(
                "estimated_hours '{}' was negative and set to 2.0",
                display_raw(raw)
            )),
        ),
        Some(h) => (h, None),
        None => (
            DEFAULT_ESTIMATED_HOURS,
            Some(format!(
                "estimated_hours value '{}' is invalid and defaulted to 2.0",
                display_raw(raw)
            )),
        ),
    }
}

/// Dependencies: always a list of ids.
pub fn resolve_dependencies(raw: Option<&Value>) -> (Vec<String>, Option<String>) {
    let Some(raw) = raw else {
        return (Vec::new(), None);
    };

    match coerce_list(raw) {
        ListCoercion::Empty => (Vec::new(), None),
        ListCoercion::Strings(deps) => (deps, None),
        ListCoercion::Split(deps) => {
            let note = format!(
                "dependencies value was a string and coerced to list: {}",
                quoted_list(&deps)
            );
            (deps, Some(note))
        }
        ListCoercion::Cast(deps) => (deps, Some("dependencies value coerced to list".to_string())),
        ListCoercion::Invalid => (
            Vec::new(),
            Some("dependencies value invalid; treated as empty list".to_string()),
        ),
    }
}

/// `['a', 'b']`
fn quoted_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| format!("'{s}'")).collect();
    format!("[{}]", quoted.join(", "))
}

/// Unknown dependency ids are reported but stay in the task's list.
fn check_dependency_refs(tasks: &[NormalizedTask], warnings: &mut TaskWarnings) {
    let known: HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();

    for t in tasks {
        for dep in &t.dependencies {
            if !known.contains(dep.as_str()) {
                warnings.push(&t.id, format!("dependency '{dep}' not found in provided tasks"));
            }
        }
    }
}
