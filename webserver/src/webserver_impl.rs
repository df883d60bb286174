//! Main webserver implementation
//!
//! The WebServer struct owns the request state and the injected
//! `AttributionService`; handlers are generic over the service so tests can
//! drive the router against a mock.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    response::Json,
    routing::{get, post},
};
use shared::{
    AttributionReport, AttributionRequest, BatchRequest, BatchResponse, HealthStatus, ProcessId, ServiceStatus,
    logging, process_debug, process_info,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::error::{WebServerError, WebServerResult};
use crate::state::WebServerState;
use crate::traits::AttributionService;

/// Main webserver struct with dependency injection
pub struct WebServer<A: AttributionService> {
    state: Arc<WebServerState>,
    service: Arc<A>,
}

impl<A: AttributionService> Clone for WebServer<A> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            service: Arc::clone(&self.service),
        }
    }
}

impl<A> WebServer<A>
where
    A: AttributionService + 'static,
{
    pub fn new(bind_address: SocketAddr, service: A) -> Self {
        Self {
            state: Arc::new(WebServerState::new(bind_address)),
            service: Arc::new(service),
        }
    }

    /// Build the Axum router with all routes
    pub fn build_router(&self) -> Router {
        Router::new()
            .route("/health", get(health_check::<A>))
            .route("/api/status", get(status_handler::<A>))
            .route("/api/attribution", post(attribution_handler::<A>))
            .route("/api/attribution/batch", post(batch_handler::<A>))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive())
                    .into_inner(),
            )
            .with_state(self.clone())
    }

    /// Serve until Ctrl+C
    pub async fn run(&self) -> WebServerResult<()> {
        let router = self.build_router();
        let address = self.state.bind_address;

        let listener = tokio::net::TcpListener::bind(address)
            .await
            .map_err(|e| WebServerError::ServerStartup(format!("Failed to bind to {address}: {e}")))?;

        process_info!(ProcessId::current(), "🌐 Attribution service listening on http://{}", address);

        let state = Arc::clone(&self.state);
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                state.set_running(false);
            })
            .await?;

        Ok(())
    }

    pub fn state(&self) -> &Arc<WebServerState> {
        &self.state
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => logging::log_shutdown(ProcessId::current(), "Received Ctrl+C signal"),
        Err(err) => logging::log_error(ProcessId::current(), "Signal handling", &err),
    }
}

// HTTP Handlers

/// Health check endpoint
async fn health_check<A>(State(webserver): State<WebServer<A>>) -> Json<HealthStatus>
where
    A: AttributionService + 'static,
{
    Json(HealthStatus {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: webserver.state.get_uptime_seconds(),
    })
}

/// Request counters and the active engine configuration
async fn status_handler<A>(State(webserver): State<WebServer<A>>) -> Json<ServiceStatus>
where
    A: AttributionService + 'static,
{
    Json(webserver.state.status(webserver.service.engine_config()))
}

/// Attribute a single order
async fn attribution_handler<A>(
    State(webserver): State<WebServer<A>>,
    payload: Result<Json<AttributionRequest>, JsonRejection>,
) -> WebServerResult<Json<AttributionReport>>
where
    A: AttributionService + 'static,
{
    let Json(request) = payload.map_err(|rejection| WebServerError::invalid_request(rejection.body_text()))?;

    let request_id = Uuid::new_v4();
    process_debug!(
        ProcessId::current(),
        request_id = %request_id,
        order_id = %request.order_id,
        "Attribution request with {} touchpoints",
        request.touchpoints.len()
    );

    let result = webserver.service.attribute(request).await;
    webserver.state.record_single(result.is_ok());
    Ok(Json(result?))
}

/// Attribute a batch of orders; per-order failures are reported inline
async fn batch_handler<A>(
    State(webserver): State<WebServer<A>>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> WebServerResult<Json<BatchResponse>>
where
    A: AttributionService + 'static,
{
    let Json(request) = payload.map_err(|rejection| WebServerError::invalid_request(rejection.body_text()))?;

    let request_id = Uuid::new_v4();
    let orders = request.orders.len();
    process_debug!(
        ProcessId::current(),
        request_id = %request_id,
        "Batch request with {} orders",
        orders
    );

    match webserver.service.attribute_batch(request).await {
        Ok(response) => {
            webserver.state.record_batch(&response);
            Ok(Json(response))
        }
        Err(err) => {
            webserver.state.record_failed_batch(orders);
            Err(err)
        }
    }
}
