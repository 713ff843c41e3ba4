//! Analysis requests: the task records plus any strategy/weights carried
//! alongside them.
//!
//! JSON payloads are either a bare array of tasks or an envelope:
//!   {"tasks": [...], "strategy": "high_impact", "weights": {"urgency": 1}}

use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::fs;
use std::path::Path;
use taskrank_core::extract_batch;
use tracing::debug;

use crate::csv_tasks::parse_tasks_csv;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Csv,
}

impl SourceFormat {
    /// `.csv` files are CSV; everything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => SourceFormat::Csv,
            _ => SourceFormat::Json,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisRequest {
    pub records: Vec<Value>,
    pub strategy: Option<String>,
    pub weights: Option<Value>,
}

/// Parse a JSON payload. Fails on invalid JSON or when no task list is found.
pub fn parse_request_json(text: &str) -> Result<AnalysisRequest> {
    let text = text.trim();
    let payload: Value = if text.is_empty() {
        Value::Array(Vec::new())
    } else {
        serde_json::from_str(text).context("invalid json")?
    };

    let records = extract_batch(&payload)?.to_vec();
    let strategy = payload
        .get("strategy")
        .and_then(Value::as_str)
        .map(str::to_string);
    let weights = payload.get("weights").filter(|w| !w.is_null()).cloned();

    Ok(AnalysisRequest {
        records,
        strategy,
        weights,
    })
}

/// Read a request from a file, choosing the parser by extension.
pub fn read_request(path: &Path) -> Result<AnalysisRequest> {
    if !path.exists() {
        bail!("task file not found: {}", path.display());
    }
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let format = SourceFormat::from_path(path);

    let request = match format {
        SourceFormat::Json => parse_request_json(&text),
        SourceFormat::Csv => parse_tasks_csv(text.as_bytes()).map(|records| AnalysisRequest {
            records,
            ..AnalysisRequest::default()
        }),
    }
    .with_context(|| format!("parsing {}", path.display()))?;

    debug!(path = %path.display(), ?format, records = request.records.len(), "read task file");
    Ok(request)
}
