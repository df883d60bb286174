//! Request bodies used across webserver tests

use serde_json::{Value, json};

pub struct TestFixtures;

impl TestFixtures {
    pub const SEED: u64 = 42;

    /// JSON journey `tp1..tpN`, one touchpoint per hour
    pub fn journey(n: usize) -> Value {
        let touchpoints: Vec<Value> = (0..n)
            .map(|i| {
                json!({
                    "id": format!("tp{}", i + 1),
                    "type": if i % 2 == 0 { "media" } else { "email" },
                    "timestamp": format!("2024-03-01T{:02}:00:00Z", i % 24),
                    "cost": (i + 1) as f64,
                })
            })
            .collect();
        Value::Array(touchpoints)
    }

    pub fn single_request(order_id: &str, n: usize, value: f64) -> Value {
        json!({
            "order_id": order_id,
            "touchpoints": Self::journey(n),
            "conversion_value": value,
        })
    }

    /// Two valid orders around one with a negative value
    pub fn batch_request() -> Value {
        json!({
            "orders": [
                {"order_id": "order-1", "conversion_value": 1000.0},
                {"order_id": "order-2", "conversion_value": -50.0},
                {"order_id": "order-3", "amount": 420.0, "method": "monte_carlo"},
            ],
            "journeys": {
                "order-1": Self::journey(3),
                "order-2": Self::journey(2),
                "order-3": Self::journey(4),
            }
        })
    }

    /// Three orders where the middle journey has a touchpoint without a timestamp
    pub fn batch_with_malformed_journey() -> Value {
        json!({
            "orders": [
                {"order_id": "order-1", "conversion_value": 500.0},
                {"order_id": "order-2", "conversion_value": 250.0},
                {"order_id": "order-3", "conversion_value": 125.0},
            ],
            "journeys": {
                "order-1": Self::journey(3),
                "order-2": [{"id": "tp1", "type": "media", "cost": 1.0}],
                "order-3": Self::journey(2),
            }
        })
    }
}
