//! Single-order attribution messages
//!
//! Request and response bodies for computing one order's attribution, plus
//! the error descriptor returned in place of a report.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AttributionMethod, MethodUsed, Touchpoint, ValuePolicy};

/// Request to attribute one order's conversion value
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AttributionRequest {
    pub order_id: String,

    #[serde(default)]
    pub touchpoints: Vec<Touchpoint>,

    pub conversion_value: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<AttributionMethod>,

    /// Overrides the engine's configured policy for this order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_policy: Option<ValuePolicy>,

    /// Touchpoints stamped after this instant earn no credit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converted_at: Option<DateTime<Utc>>,

    /// Overrides the engine's sampling seed for this order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Overrides the engine's Monte Carlo permutation count for this order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u64>,

    /// Overrides the engine's Monte Carlo wall-clock budget for this order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_budget_ms: Option<u64>,
}

impl AttributionRequest {
    pub fn new(order_id: impl Into<String>, touchpoints: Vec<Touchpoint>, conversion_value: f64) -> Self {
        Self {
            order_id: order_id.into(),
            touchpoints,
            conversion_value,
            method: None,
            value_policy: None,
            converted_at: None,
            seed: None,
            iterations: None,
            time_budget_ms: None,
        }
    }

    pub fn with_method(mut self, method: AttributionMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_policy(mut self, policy: ValuePolicy) -> Self {
        self.value_policy = Some(policy);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = Some(iterations);
        self
    }

    pub fn with_time_budget_ms(mut self, budget_ms: u64) -> Self {
        self.time_budget_ms = Some(budget_ms);
        self
    }

    pub fn converted_at(mut self, at: DateTime<Utc>) -> Self {
        self.converted_at = Some(at);
        self
    }

    pub fn method(&self) -> AttributionMethod {
        self.method.unwrap_or_default()
    }
}

/// Successful attribution of one order
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AttributionReport {
    pub order_id: String,
    pub attribution: BTreeMap<String, f64>,
    pub method_used: MethodUsed,
    pub touchpoint_count: usize,

    /// Permutations sampled, present only for Monte Carlo results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub samples: Option<u64>,
}

impl AttributionReport {
    pub fn total(&self) -> f64 {
        self.attribution.values().sum()
    }

    pub fn weight(&self, touchpoint_id: &str) -> Option<f64> {
        self.attribution.get(touchpoint_id).copied()
    }
}

/// Error category visible to callers
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    InfeasibleMethod,
    ComputationTimeout,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::InfeasibleMethod => write!(f, "infeasible_method"),
            ErrorKind::ComputationTimeout => write!(f, "computation_timeout"),
            ErrorKind::Internal => write!(f, "internal"),
        }
    }
}

/// Wire form of a failed computation
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorDescriptor {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorDescriptor {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
