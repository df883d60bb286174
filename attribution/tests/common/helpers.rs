//! Test helpers and builder patterns for attribution tests

use std::sync::Arc;

use attribution::{AttributionOrchestrator, BatchAttributionRunner, CoalitionValueFunction};
use shared::{AttributionReport, EngineConfig, ValuePolicy};

use super::fixtures::TestFixtures;

/// Builder for orchestrators with seeded, test-sized defaults
pub struct OrchestratorBuilder {
    config: EngineConfig,
    policy: Option<Arc<dyn CoalitionValueFunction>>,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig {
                seed: Some(TestFixtures::SEED),
                monte_carlo_iterations: 4_000,
                ..EngineConfig::default()
            },
            policy: None,
        }
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.config.exact_threshold = threshold;
        self
    }

    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.config.monte_carlo_iterations = iterations;
        self
    }

    pub fn with_value_policy(mut self, policy: ValuePolicy) -> Self {
        self.config.value_policy = policy;
        self
    }

    pub fn with_downgrade(mut self) -> Self {
        self.config.downgrade_infeasible_exact = true;
        self
    }

    pub fn with_value_function(mut self, policy: Arc<dyn CoalitionValueFunction>) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn build(self) -> AttributionOrchestrator {
        let orchestrator = AttributionOrchestrator::new(self.config).expect("valid test config");
        match self.policy {
            Some(policy) => orchestrator.with_value_function(policy),
            None => orchestrator,
        }
    }

    pub fn build_runner(self) -> BatchAttributionRunner {
        BatchAttributionRunner::new(Arc::new(self.build()))
    }
}

/// Assertion helpers
pub struct TestHelpers;

impl TestHelpers {
    /// Weights sum to `expected` within the relative tolerance
    pub fn assert_efficient(report: &AttributionReport, expected: f64) {
        let total = report.total();
        let scale = expected.abs().max(1.0);
        assert!(
            (total - expected).abs() / scale < TestFixtures::TOLERANCE,
            "weights sum to {total}, expected {expected}"
        );
    }

    pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected} ± {tolerance}, got {actual}"
        );
    }

    pub fn assert_non_negative(report: &AttributionReport) {
        for (id, weight) in &report.attribution {
            assert!(*weight >= 0.0, "{id} has negative weight {weight}");
        }
    }
}
