//! Service implementations
//!
//! Real implementations of the service traits for production use

pub mod attribution_service;

// Re-export service implementations
pub use attribution_service::RealAttributionService;
