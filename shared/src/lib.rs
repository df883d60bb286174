//! Shared types for the attribution system
//!
//! Contains the data model, wire messages and configuration shared by the
//! engine library, the CLI runner and the HTTP service.

pub mod types;
pub mod errors;
pub mod logging;
pub mod messages;

pub use types::*;
pub use errors::*;

pub use messages::{
    // Single-order computation
    AttributionRequest, AttributionReport, ErrorDescriptor, ErrorKind,

    // Batch computation
    BatchOrder, BatchRequest, BatchResponse, Lenient, OrderOutcome,

    // Service health
    HealthStatus, ServiceStatus,

    // Configuration types
    EngineConfig, WebServerConfig,
};
