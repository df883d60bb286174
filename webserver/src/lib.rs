//! HTTP service for the attribution engine
//!
//! Exposes single-order and batch Shapley attribution plus health and status
//! endpoints over axum. Engine work runs on the blocking pool.

pub mod error;
pub mod services;
pub mod state;
pub mod traits;
pub mod webserver_impl;

// Re-export main types
pub use error::{WebServerError, WebServerResult};
pub use state::WebServerState;
pub use webserver_impl::WebServer;

// Re-export trait definitions
pub use traits::{AttributionService, MockAttributionService};

// Re-export service implementations
pub use services::RealAttributionService;
