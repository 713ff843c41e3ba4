use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use taskrank_core::{AnalysisStore, RunResult, StoreError};

/// `$TASKRANK_HOME`, or `~/.taskrank`.
pub fn taskrank_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("TASKRANK_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".taskrank"))
}

pub fn ensure_taskrank_home() -> Result<PathBuf> {
    let dir = taskrank_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn last_analysis_path() -> Result<PathBuf> {
    Ok(ensure_taskrank_home()?.join("last_analysis.json"))
}

/// Keeps the latest analysis as a JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn backend(e: impl std::fmt::Display) -> StoreError {
    StoreError::Backend(e.to_string())
}

impl AnalysisStore for FileStore {
    fn store_latest(&mut self, result: &RunResult) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(result).map_err(backend)?;
        fs::write(&self.path, json)
            .map_err(|e| backend(format!("write {}: {e}", self.path.display())))
    }

    fn fetch_latest(&self) -> Result<Option<RunResult>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let s = fs::read_to_string(&self.path)
            .map_err(|e| backend(format!("read {}: {e}", self.path.display())))?;
        serde_json::from_str(&s)
            .map(Some)
            .map_err(|e| backend(format!("parse {}: {e}", self.path.display())))
    }
}
