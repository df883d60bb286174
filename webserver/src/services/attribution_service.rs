//! Engine-backed attribution service
//!
//! Shapley computation is CPU-bound, so every call is moved onto tokio's
//! blocking pool; the batch runner fans out further on rayon from there.

use std::sync::Arc;

use async_trait::async_trait;
use attribution::{AttributionOrchestrator, BatchAttributionRunner};
use shared::{AttributionReport, AttributionRequest, BatchRequest, BatchResponse, EngineConfig};
use tokio::task;

use crate::error::{WebServerError, WebServerResult};
use crate::traits::AttributionService;

/// Real attribution service wrapping a shared orchestrator
#[derive(Clone)]
pub struct RealAttributionService {
    runner: Arc<BatchAttributionRunner>,
}

impl RealAttributionService {
    pub fn new(orchestrator: AttributionOrchestrator) -> Self {
        Self {
            runner: Arc::new(BatchAttributionRunner::new(Arc::new(orchestrator))),
        }
    }

    /// Build the engine from configuration
    pub fn from_config(config: EngineConfig) -> WebServerResult<Self> {
        Ok(Self::new(AttributionOrchestrator::new(config)?))
    }
}

#[async_trait]
impl AttributionService for RealAttributionService {
    async fn attribute(&self, request: AttributionRequest) -> WebServerResult<AttributionReport> {
        let runner = Arc::clone(&self.runner);
        let report = task::spawn_blocking(move || runner.orchestrator().compute_attribution(&request))
            .await
            .map_err(|e| WebServerError::TaskFailed(e.to_string()))??;
        Ok(report)
    }

    async fn attribute_batch(&self, request: BatchRequest) -> WebServerResult<BatchResponse> {
        let runner = Arc::clone(&self.runner);
        task::spawn_blocking(move || runner.compute_batch(&request))
            .await
            .map_err(|e| WebServerError::TaskFailed(e.to_string()))
    }

    fn engine_config(&self) -> EngineConfig {
        self.runner.orchestrator().config().clone()
    }
}
