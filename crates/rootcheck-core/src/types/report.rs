//! Verdict report -- every signal's outcome for one computation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::signal::{SignalKind, SignalOutcome};

/// How signal results are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Stop at the first positive; later signals are skipped
    #[default]
    ShortCircuit,
    /// Evaluate everything, then OR
    Exhaustive,
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "short-circuit" | "short" => Ok(Self::ShortCircuit),
            "exhaustive" | "all" => Ok(Self::Exhaustive),
            _ => Err(format!(
                "unknown strategy `{s}`, expected short-circuit or exhaustive"
            )),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ShortCircuit => write!(f, "short-circuit"),
            Self::Exhaustive => write!(f, "exhaustive"),
        }
    }
}

/// Structured verdict with the evidence trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionReport {
    /// Host identifier (machine-id or hostname)
    pub host_id: String,
    /// When the verdict was computed
    pub collected_at: DateTime<Utc>,
    /// Combination strategy used
    pub strategy: Strategy,
    /// Whether signals ran in parallel
    #[serde(default)]
    pub concurrent: bool,
    /// Final verdict
    pub rooted: bool,
    /// One outcome per registered signal, in registration order
    pub outcomes: Vec<SignalOutcome>,
}

impl DetectionReport {
    /// Signals that contributed `true`.
    #[must_use]
    pub fn positives(&self) -> Vec<SignalKind> {
        self.outcomes
            .iter()
            .filter(|o| o.is_positive())
            .map(|o| o.signal)
            .collect()
    }

    /// Outcome for one signal, if registered.
    #[must_use]
    pub fn outcome(&self, signal: SignalKind) -> Option<&SignalOutcome> {
        self.outcomes.iter().find(|o| o.signal == signal)
    }
}
