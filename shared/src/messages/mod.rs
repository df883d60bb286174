//! Message types for the attribution system
//!
//! This module organizes all request/response payloads by category:
//! - `attribution`: single-order requests, reports and error descriptors
//! - `batch`: multi-order requests with per-order outcomes
//! - `health`: liveness and status payloads
//! - `config`: engine and server configuration

pub mod attribution;
pub mod batch;
pub mod health;
pub mod config;

pub use attribution::{AttributionReport, AttributionRequest, ErrorDescriptor, ErrorKind};

pub use batch::{BatchOrder, BatchRequest, BatchResponse, Lenient, OrderOutcome};

pub use health::{HealthStatus, ServiceStatus};

pub use config::{EngineConfig, WebServerConfig};
