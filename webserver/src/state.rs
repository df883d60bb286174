//! Webserver state management
//!
//! Request counters and uptime for `/health` and `/api/status`. Counters are
//! plain atomics; no request ever waits on another.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

use shared::{BatchResponse, EngineConfig, ServiceStatus};

/// Core webserver state
#[derive(Debug)]
pub struct WebServerState {
    pub bind_address: SocketAddr,
    pub server_start_time: Instant,

    is_running: AtomicBool,
    single_requests: AtomicU64,
    batch_requests: AtomicU64,
    orders_attributed: AtomicU64,
    failed_orders: AtomicU64,
}

impl WebServerState {
    pub fn new(bind_address: SocketAddr) -> Self {
        Self {
            bind_address,
            server_start_time: Instant::now(),
            is_running: AtomicBool::new(true),
            single_requests: AtomicU64::new(0),
            batch_requests: AtomicU64::new(0),
            orders_attributed: AtomicU64::new(0),
            failed_orders: AtomicU64::new(0),
        }
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }

    pub fn set_running(&self, running: bool) {
        self.is_running.store(running, Ordering::Relaxed);
    }

    pub fn get_uptime_seconds(&self) -> u64 {
        self.server_start_time.elapsed().as_secs()
    }

    /// Count a single-order request and its outcome
    pub fn record_single(&self, succeeded: bool) {
        self.single_requests.fetch_add(1, Ordering::Relaxed);
        self.record_orders(u64::from(succeeded), u64::from(!succeeded));
    }

    /// Count a batch request and its per-order outcomes
    pub fn record_batch(&self, response: &BatchResponse) {
        self.batch_requests.fetch_add(1, Ordering::Relaxed);
        self.record_orders(response.success_count() as u64, response.error_count() as u64);
    }

    /// Count a batch that failed as a whole
    pub fn record_failed_batch(&self, orders: usize) {
        self.batch_requests.fetch_add(1, Ordering::Relaxed);
        self.record_orders(0, orders as u64);
    }

    fn record_orders(&self, succeeded: u64, failed: u64) {
        self.orders_attributed.fetch_add(succeeded, Ordering::Relaxed);
        self.failed_orders.fetch_add(failed, Ordering::Relaxed);
    }

    pub fn status(&self, engine: EngineConfig) -> ServiceStatus {
        ServiceStatus {
            uptime_seconds: self.get_uptime_seconds(),
            single_requests: self.single_requests.load(Ordering::Relaxed),
            batch_requests: self.batch_requests.load(Ordering::Relaxed),
            orders_attributed: self.orders_attributed.load(Ordering::Relaxed),
            failed_orders: self.failed_orders.load(Ordering::Relaxed),
            engine,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{AttributionReport, ErrorDescriptor, ErrorKind, MethodUsed, OrderOutcome};
    use std::collections::BTreeMap;
    use std::net::{IpAddr, Ipv4Addr};

    fn state() -> WebServerState {
        WebServerState::new(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000))
    }

    #[test]
    fn test_webserver_state_creation() {
        let state = state();

        assert!(state.is_running());
        let status = state.status(EngineConfig::default());
        assert_eq!(status.single_requests, 0);
        assert_eq!(status.orders_attributed, 0);
    }

    #[test]
    fn test_request_counters() {
        let state = state();
        state.record_single(true);
        state.record_single(false);

        let mut results = BTreeMap::new();
        results.insert(
            "a".to_string(),
            OrderOutcome::Success(AttributionReport {
                order_id: "a".to_string(),
                attribution: BTreeMap::new(),
                method_used: MethodUsed::Exact,
                touchpoint_count: 0,
                samples: None,
            }),
        );
        results.insert(
            "b".to_string(),
            OrderOutcome::Error {
                error: ErrorDescriptor::new(ErrorKind::Validation, "bad"),
            },
        );
        state.record_batch(&BatchResponse { results });

        let status = state.status(EngineConfig::default());
        assert_eq!(status.single_requests, 2);
        assert_eq!(status.batch_requests, 1);
        assert_eq!(status.orders_attributed, 2);
        assert_eq!(status.failed_orders, 2);
    }

    #[test]
    fn test_running_flag() {
        let state = state();
        state.set_running(false);
        assert!(!state.is_running());
    }
}
