//! Test helper utilities for webserver integration tests

use std::net::SocketAddr;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use serde_json::Value;
use shared::EngineConfig;
use tower::ServiceExt;
use webserver::{MockAttributionService, RealAttributionService, WebServer};

use super::fixtures::TestFixtures;

pub struct TestHelpers;

impl TestHelpers {
    pub fn test_address() -> SocketAddr {
        "127.0.0.1:3000".parse().unwrap()
    }

    /// Server backed by the real engine with a fixed seed
    pub fn real_server() -> WebServer<RealAttributionService> {
        let config = EngineConfig {
            seed: Some(TestFixtures::SEED),
            monte_carlo_iterations: 2_000,
            ..EngineConfig::default()
        };
        let service = RealAttributionService::from_config(config).unwrap();
        WebServer::new(Self::test_address(), service)
    }

    pub fn mock_server(service: MockAttributionService) -> WebServer<MockAttributionService> {
        WebServer::new(Self::test_address(), service)
    }

    /// Send a request through the router and decode the JSON body
    pub async fn send(router: Router, method: Method, uri: &str, body: Option<String>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map(Body::from).unwrap_or_else(Body::empty))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
        Self::send(router, Method::GET, uri, None).await
    }

    pub async fn post_json(router: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
        Self::send(router, Method::POST, uri, Some(body.to_string())).await
    }

    /// Sum of an `attribution` object's weights
    pub fn total(attribution: &Value) -> f64 {
        attribution
            .as_object()
            .map(|weights| weights.values().filter_map(Value::as_f64).sum())
            .unwrap_or(0.0)
    }
}
