//! Service health and status payloads

use serde::{Deserialize, Serialize};

use super::config::EngineConfig;

/// Liveness probe body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Operational snapshot for `/api/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub uptime_seconds: u64,
    pub single_requests: u64,
    pub batch_requests: u64,
    pub orders_attributed: u64,
    pub failed_orders: u64,
    pub engine: EngineConfig,
}
