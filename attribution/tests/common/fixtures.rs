//! Test fixtures and data for attribution tests

use chrono::{DateTime, Duration, TimeZone, Utc};
use shared::{BatchOrder, BatchRequest, Touchpoint};

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const CONVERSION_VALUE: f64 = 1000.0;
    pub const SEED: u64 = 20240301;
    pub const TOLERANCE: f64 = 1e-6;

    const CHANNELS: [&'static str; 4] = ["media", "channel", "content", "email"];

    /// Start of every fixture journey
    pub fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    /// Hourly journey `tp1..tpN` cycling through channel types
    pub fn journey(n: usize) -> Vec<Touchpoint> {
        (0..n)
            .map(|i| {
                Touchpoint::new(
                    format!("tp{}", i + 1),
                    Self::CHANNELS[i % Self::CHANNELS.len()],
                    Self::base_time() + Duration::hours(i as i64),
                )
            })
            .collect()
    }

    /// Journey whose touchpoints carry the given costs
    pub fn costed_journey(costs: &[f64]) -> Vec<Touchpoint> {
        Self::journey(costs.len())
            .into_iter()
            .zip(costs)
            .map(|(tp, &cost)| tp.with_cost(cost))
            .collect()
    }

    /// Three orders, the second with a negative conversion value
    pub fn batch_with_invalid_order() -> BatchRequest {
        BatchRequest::default()
            .with_order(BatchOrder::new("order-1", 1000.0), Self::journey(3))
            .with_order(BatchOrder::new("order-2", -50.0), Self::journey(2))
            .with_order(BatchOrder::new("order-3", 420.0), Self::journey(5))
    }

    /// Ten orders with journeys of one to ten touchpoints
    pub fn typical_batch() -> BatchRequest {
        (1..=10).fold(BatchRequest::default(), |batch, i| {
            let mut order = BatchOrder::new(format!("order-{i}"), 100.0 * i as f64);
            order.customer_id = Some(format!("customer-{}", i % 3));
            batch.with_order(order, Self::journey(i))
        })
    }

    /// Raw batch file: one sound order, one touchpoint without a timestamp
    /// and one with a non-numeric cost
    pub fn batch_with_malformed_journeys() -> &'static str {
        r#"{
            "orders": [
                {"order_id": "o1", "conversion_value": 300.0},
                {"order_id": "o2", "conversion_value": 200.0},
                {"order_id": "o3", "conversion_value": 100.0}
            ],
            "journeys": {
                "o1": [
                    {"id": "a", "type": "media", "timestamp": "2024-03-01T09:00:00Z"},
                    {"id": "b", "type": "email", "timestamp": "2024-03-01T10:00:00Z"}
                ],
                "o2": [
                    {"id": "a", "type": "media"}
                ],
                "o3": [
                    {"id": "a", "type": "media", "timestamp": "2024-03-01T09:00:00Z", "cost": "cheap"}
                ]
            }
        }"#
    }
}
