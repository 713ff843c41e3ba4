use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use taskrank_core::{Strategy, Weights};

use crate::state::ensure_taskrank_home;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSection {
    /// Preset name; unknown names fall back to smart_balance.
    #[serde(default = "default_strategy")]
    pub strategy: String,

    /// IANA timezone used to decide what "today" is.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Custom weights replacing the preset (missing factors weigh 0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Weights>,
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            timezone: default_timezone(),
            weights: None,
        }
    }
}

fn default_strategy() -> String {
    Strategy::default().as_str().to_string()
}

fn default_timezone() -> String {
    "America/Chicago".to_string()
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_taskrank_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s)
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
