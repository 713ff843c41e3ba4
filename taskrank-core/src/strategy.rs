//! Weighting strategies for blending sub-scores.

use crate::coerce::coerce_float;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::warn;

const SUM_TOLERANCE: f64 = 1e-6;

/// Weight per scoring factor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub urgency: f64,
    pub importance: f64,
    pub dependencies: f64,
    pub effort: f64,
}

impl Weights {
    pub const fn new(urgency: f64, importance: f64, dependencies: f64, effort: f64) -> Self {
        Self {
            urgency,
            importance,
            dependencies,
            effort,
        }
    }

    pub fn sum(&self) -> f64 {
        self.urgency + self.importance + self.dependencies + self.effort
    }

    /// Negative or non-finite weights count as 0.
    pub fn sanitized(self) -> Self {
        let clean = |w: f64| if w.is_finite() && w > 0.0 { w } else { 0.0 };
        Self::new(
            clean(self.urgency),
            clean(self.importance),
            clean(self.dependencies),
            clean(self.effort),
        )
    }

    /// Rescale proportionally so the weights sum to 1. Weights already
    /// summing to 1 (within 1e-6) are returned unchanged. `None` when the
    /// weights sum to zero and cannot be rescaled.
    pub fn normalized(self) -> Option<Self> {
        let sum = self.sum();
        if (sum - 1.0).abs() <= SUM_TOLERANCE {
            return Some(self);
        }
        if sum <= 0.0 {
            return None;
        }
        Some(Self::new(
            self.urgency / sum,
            self.importance / sum,
            self.dependencies / sum,
            self.effort / sum,
        ))
    }

    /// Read a caller-supplied weight mapping.
    ///
    /// Missing factors weigh 0. Returns `None` when the value is not a
    /// mapping or names none of the four factors, so the preset applies.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        const FACTORS: [&str; 4] = ["urgency", "importance", "dependencies", "effort"];
        if !FACTORS.iter().any(|k| map.contains_key(*k)) {
            return None;
        }
        let read = |k: &str| map.get(k).and_then(coerce_float).unwrap_or(0.0);
        Some(
            Self::new(
                read("urgency"),
                read("importance"),
                read("dependencies"),
                read("effort"),
            )
            .sanitized(),
        )
    }

    pub fn rounded(self, places: i32) -> Self {
        Self::new(
            round_to(self.urgency, places),
            round_to(self.importance, places),
            round_to(self.dependencies, places),
            round_to(self.effort, places),
        )
    }
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Named weight presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    SmartBalance,
    DeadlineDriven,
    HighImpact,
    FastestWins,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::SmartBalance,
        Strategy::DeadlineDriven,
        Strategy::HighImpact,
        Strategy::FastestWins,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::SmartBalance => "smart_balance",
            Strategy::DeadlineDriven => "deadline_driven",
            Strategy::HighImpact => "high_impact",
            Strategy::FastestWins => "fastest_wins",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }

    /// Unrecognized names silently fall back to `smart_balance`.
    pub fn from_name(name: &str) -> Self {
        Self::parse(name).unwrap_or_default()
    }

    pub fn preset(self) -> Weights {
        match self {
            Strategy::SmartBalance => Weights::new(0.35, 0.30, 0.20, 0.15),
            Strategy::DeadlineDriven => Weights::new(0.6, 0.2, 0.1, 0.1),
            Strategy::HighImpact => Weights::new(0.2, 0.6, 0.15, 0.05),
            Strategy::FastestWins => Weights::new(0.15, 0.15, 0.1, 0.6),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the weight vector to apply: custom weights replace the preset
/// entirely, and whichever is chosen is rescaled to sum to 1.
pub fn resolve_weights(strategy: Strategy, custom: Option<Weights>) -> Weights {
    let preset = strategy.preset();
    let selected = custom.map(Weights::sanitized).unwrap_or(preset);

    match selected.normalized() {
        Some(w) => w,
        None => {
            warn!(%strategy, "custom weights sum to zero; using preset weights");
            preset
        }
    }
}
