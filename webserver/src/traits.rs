//! Service trait definitions for dependency injection
//!
//! The HTTP layer only talks to the engine through `AttributionService`, so
//! handlers can be tested against a mock.

use async_trait::async_trait;
use shared::{AttributionReport, AttributionRequest, BatchRequest, BatchResponse, EngineConfig};

use crate::error::WebServerResult;

/// Attribution engine as seen by the HTTP handlers
#[mockall::automock]
#[async_trait]
pub trait AttributionService: Send + Sync {
    /// Attribute a single order
    async fn attribute(&self, request: AttributionRequest) -> WebServerResult<AttributionReport>;

    /// Attribute every order of a batch; per-order failures are inside the response
    async fn attribute_batch(&self, request: BatchRequest) -> WebServerResult<BatchResponse>;

    /// Active engine configuration, reported by `/api/status`
    fn engine_config(&self) -> EngineConfig;
}
