//! Core types used throughout the attribution system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::errors::SharedError;

/// Global process ID singleton - set once at startup
static PROCESS_ID: OnceLock<ProcessId> = OnceLock::new();

/// Process identifier for any binary in the system
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessId {
    /// Command line batch runner
    AttributionCli,
    /// HTTP service
    WebServer,
}

impl ProcessId {
    /// Initialize the global process ID for the CLI runner
    pub fn init_cli() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::AttributionCli)
    }

    /// Initialize the global process ID for webserver
    pub fn init_webserver() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::WebServer)
    }

    /// Get the global process ID, falling back to the webserver when no
    /// binary has initialised it (library use and tests)
    pub fn current() -> &'static ProcessId {
        PROCESS_ID.get().unwrap_or(&ProcessId::WebServer)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessId::AttributionCli => write!(f, "attribution"),
            ProcessId::WebServer => write!(f, "webserver"),
        }
    }
}

/// A single marketing or sales interaction in a customer journey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Touchpoint {
    /// Unique within one journey
    pub id: String,

    /// Free-form channel tag such as `media`, `channel` or `content`
    #[serde(rename = "type", default)]
    pub touchpoint_type: String,

    pub timestamp: DateTime<Utc>,

    #[serde(default)]
    pub cost: f64,

    /// Optional score in `[0, 1]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
}

impl Touchpoint {
    pub fn new(id: impl Into<String>, touchpoint_type: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            touchpoint_type: touchpoint_type.into(),
            timestamp,
            cost: 0.0,
            quality_score: None,
        }
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_quality(mut self, score: f64) -> Self {
        self.quality_score = Some(score);
        self
    }
}

/// Requested computation method for an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributionMethod {
    /// Exact below the configured threshold, Monte Carlo above it
    #[default]
    Auto,
    Exact,
    MonteCarlo,
}

impl fmt::Display for AttributionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributionMethod::Auto => write!(f, "auto"),
            AttributionMethod::Exact => write!(f, "exact"),
            AttributionMethod::MonteCarlo => write!(f, "monte_carlo"),
        }
    }
}

impl std::str::FromStr for AttributionMethod {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(AttributionMethod::Auto),
            "exact" => Ok(AttributionMethod::Exact),
            "monte_carlo" | "montecarlo" | "monte-carlo" => Ok(AttributionMethod::MonteCarlo),
            _ => Err(SharedError::UnknownVariant {
                kind: "method".to_string(),
                input: s.to_string(),
            }),
        }
    }
}

/// Method that actually produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodUsed {
    Exact,
    MonteCarlo,
}

impl fmt::Display for MethodUsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodUsed::Exact => write!(f, "exact"),
            MethodUsed::MonteCarlo => write!(f, "monte_carlo"),
        }
    }
}

/// Coalition value policy used to credit subsets of touchpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuePolicy {
    /// Any non-empty coalition earns the full conversion value
    #[default]
    Uniform,
    /// Coalition earns its share of total touchpoint cost
    CostWeighted,
    /// Coalition earns its share of total quality score
    QualityWeighted,
    /// Coalition earns its share of recency-decayed weight
    TimeDecay,
}

impl fmt::Display for ValuePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValuePolicy::Uniform => write!(f, "uniform"),
            ValuePolicy::CostWeighted => write!(f, "cost_weighted"),
            ValuePolicy::QualityWeighted => write!(f, "quality_weighted"),
            ValuePolicy::TimeDecay => write!(f, "time_decay"),
        }
    }
}

impl std::str::FromStr for ValuePolicy {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "uniform" => Ok(ValuePolicy::Uniform),
            "cost_weighted" | "cost" => Ok(ValuePolicy::CostWeighted),
            "quality_weighted" | "quality" => Ok(ValuePolicy::QualityWeighted),
            "time_decay" | "decay" => Ok(ValuePolicy::TimeDecay),
            _ => Err(SharedError::UnknownVariant {
                kind: "value policy".to_string(),
                input: s.to_string(),
            }),
        }
    }
}
