//! Batch attribution messages
//!
//! A batch carries order headers and a separate journey map, mirroring how
//! the journey-assembly pipeline delivers touchpoints keyed by order id.
//! Headers and journeys are parsed entry by entry so a malformed order only
//! fails that order.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::attribution::{AttributionReport, AttributionRequest, ErrorDescriptor};
use crate::types::{AttributionMethod, Touchpoint, ValuePolicy};

/// Order header inside a batch request
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BatchOrder {
    pub order_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,

    #[serde(alias = "amount")]
    pub conversion_value: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<AttributionMethod>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_policy: Option<ValuePolicy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converted_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_budget_ms: Option<u64>,
}

impl BatchOrder {
    pub fn new(order_id: impl Into<String>, conversion_value: f64) -> Self {
        Self {
            order_id: order_id.into(),
            customer_id: None,
            conversion_value,
            method: None,
            value_policy: None,
            converted_at: None,
            seed: None,
            iterations: None,
            time_budget_ms: None,
        }
    }

    /// Combine the header with its journey into a single-order request
    pub fn to_request(&self, touchpoints: Vec<Touchpoint>) -> AttributionRequest {
        AttributionRequest {
            order_id: self.order_id.clone(),
            touchpoints,
            conversion_value: self.conversion_value,
            method: self.method,
            value_policy: self.value_policy,
            converted_at: self.converted_at,
            seed: self.seed,
            iterations: self.iterations,
            time_budget_ms: self.time_budget_ms,
        }
    }
}

/// Batch entry that is either well formed or kept as raw JSON
///
/// Deserialization tries `T` first and falls back to the raw value, so a bad
/// entry is reported against its own order instead of failing the batch.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum Lenient<T> {
    Parsed(T),
    Malformed(Value),
}

impl<T> Lenient<T>
where
    T: DeserializeOwned + Clone,
{
    pub fn parsed(&self) -> Option<&T> {
        match self {
            Lenient::Parsed(value) => Some(value),
            Lenient::Malformed(_) => None,
        }
    }

    /// The parsed entry, or the error explaining why it does not parse
    pub fn resolve(&self) -> Result<T, serde_json::Error> {
        match self {
            Lenient::Parsed(value) => Ok(value.clone()),
            Lenient::Malformed(raw) => serde_json::from_value(raw.clone()),
        }
    }
}

impl<T> From<T> for Lenient<T> {
    fn from(value: T) -> Self {
        Lenient::Parsed(value)
    }
}

impl Lenient<BatchOrder> {
    /// Order id of the entry, if one can be read even from a malformed header
    pub fn order_id(&self) -> Option<&str> {
        match self {
            Lenient::Parsed(order) => Some(order.order_id.as_str()),
            Lenient::Malformed(raw) => raw.get("order_id").and_then(Value::as_str),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct BatchRequest {
    pub orders: Vec<Lenient<BatchOrder>>,

    /// Touchpoints per order id; orders without an entry have an empty journey
    #[serde(default)]
    pub journeys: HashMap<String, Lenient<Vec<Touchpoint>>>,
}

impl BatchRequest {
    pub fn with_order(mut self, order: BatchOrder, touchpoints: Vec<Touchpoint>) -> Self {
        self.journeys.insert(order.order_id.clone(), touchpoints.into());
        self.orders.push(order.into());
        self
    }

    /// Add an order header without a journey entry
    pub fn with_header(mut self, order: BatchOrder) -> Self {
        self.orders.push(order.into());
        self
    }
}

/// Per-order status inside a batch response
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OrderOutcome {
    Success(AttributionReport),
    Error { error: ErrorDescriptor },
}

impl OrderOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, OrderOutcome::Success(_))
    }

    pub fn report(&self) -> Option<&AttributionReport> {
        match self {
            OrderOutcome::Success(report) => Some(report),
            OrderOutcome::Error { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorDescriptor> {
        match self {
            OrderOutcome::Success(_) => None,
            OrderOutcome::Error { error } => Some(error),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct BatchResponse {
    pub results: BTreeMap<String, OrderOutcome>,
}

impl BatchResponse {
    pub fn success_count(&self) -> usize {
        self.results.values().filter(|outcome| outcome.is_success()).count()
    }

    pub fn error_count(&self) -> usize {
        self.results.len() - self.success_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::attribution::ErrorKind;
    use crate::types::MethodUsed;

    #[test]
    fn test_batch_order_accepts_amount_alias() {
        let json = r#"{"order_id": "o-1", "customer_id": "c-9", "amount": 250.0}"#;
        let order: BatchOrder = serde_json::from_str(json).unwrap();

        assert_eq!(order.conversion_value, 250.0);
        assert_eq!(order.customer_id.as_deref(), Some("c-9"));
        assert!(order.method.is_none());
    }

    #[test]
    fn test_outcome_is_tagged_by_status() {
        let mut attribution = BTreeMap::new();
        attribution.insert("tp1".to_string(), 100.0);
        let success = OrderOutcome::Success(AttributionReport {
            order_id: "o-1".to_string(),
            attribution,
            method_used: MethodUsed::Exact,
            touchpoint_count: 1,
            samples: None,
        });
        let failure = OrderOutcome::Error {
            error: ErrorDescriptor::new(ErrorKind::Validation, "conversion_value must be non-negative"),
        };

        let success_json = serde_json::to_value(&success).unwrap();
        let failure_json = serde_json::to_value(&failure).unwrap();

        assert_eq!(success_json["status"], "success");
        assert_eq!(success_json["method_used"], "exact");
        assert_eq!(failure_json["status"], "error");
        assert_eq!(failure_json["error"]["kind"], "validation");

        let parsed: OrderOutcome = serde_json::from_value(failure_json).unwrap();
        assert_eq!(parsed, failure);
    }

    #[test]
    fn test_malformed_entries_do_not_fail_the_batch() {
        let json = r#"{
            "orders": [
                {"order_id": "ok", "conversion_value": 10.0},
                {"order_id": "no-value"},
                {"conversion_value": 5.0}
            ],
            "journeys": {
                "ok": [{"id": "a", "type": "media", "timestamp": "2024-01-01T00:00:00Z"}],
                "no-value": [{"id": "b", "cost": "cheap"}]
            }
        }"#;
        let request: BatchRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.orders.len(), 3);
        assert!(request.orders[0].parsed().is_some());
        assert_eq!(request.orders[1].order_id(), Some("no-value"));
        assert!(request.orders[1].resolve().unwrap_err().to_string().contains("conversion_value"));
        assert_eq!(request.orders[2].order_id(), None);

        assert_eq!(request.journeys["ok"].resolve().unwrap().len(), 1);
        assert!(request.journeys["no-value"].parsed().is_none());
        assert!(request.journeys["no-value"].resolve().is_err());
    }

    #[test]
    fn test_parsed_entries_serialize_transparently() {
        let request = BatchRequest::default().with_header(BatchOrder::new("o-1", 3.0));
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["orders"][0]["order_id"], "o-1");
        assert_eq!(json["orders"][0]["conversion_value"], 3.0);
    }

    #[test]
    fn test_response_counts() {
        let mut response = BatchResponse::default();
        response.results.insert(
            "bad".to_string(),
            OrderOutcome::Error {
                error: ErrorDescriptor::new(ErrorKind::Internal, "internal computation failure"),
            },
        );
        assert_eq!(response.success_count(), 0);
        assert_eq!(response.error_count(), 1);
    }
}
