//! Attribution orchestrator
//!
//! Runs one order through Validate → Select Method → Compute → Normalize.
//! Holds only immutable configuration, so a single instance can be shared
//! across threads and requests.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use shared::{
    AttributionMethod, AttributionReport, AttributionRequest, EngineConfig, MethodUsed, ProcessId, Touchpoint,
    ValuePolicy, process_debug, process_error, process_warn,
};

use crate::core::{ExactShapleyComputer, MonteCarloShapleyEstimator, SamplingPlan, normalize, validate_request};
use crate::error::{AttributionError, AttributionResult};
use crate::valuation::strategies;
use crate::valuation::{BoundGame, CoalitionValueFunction, OrderContext};

pub struct AttributionOrchestrator {
    config: EngineConfig,
    exact: ExactShapleyComputer,
    /// Replaces the configured policy for every order when set
    custom_policy: Option<Arc<dyn CoalitionValueFunction>>,
}

impl fmt::Debug for AttributionOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributionOrchestrator")
            .field("config", &self.config)
            .field("exact", &self.exact)
            .field("custom_policy", &self.custom_policy.as_ref().map(|policy| policy.name()))
            .finish()
    }
}

impl AttributionOrchestrator {
    pub fn new(config: EngineConfig) -> AttributionResult<Self> {
        config.validate()?;
        Ok(Self {
            exact: ExactShapleyComputer::new(config.exact_threshold),
            config,
            custom_policy: None,
        })
    }

    /// Inject a crediting policy that overrides configured and per-request policies
    pub fn with_value_function(mut self, policy: Arc<dyn CoalitionValueFunction>) -> Self {
        self.custom_policy = Some(policy);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Attribute a journey given as separate parts
    pub fn attribute(
        &self,
        order_id: &str,
        touchpoints: Vec<Touchpoint>,
        conversion_value: f64,
        method: AttributionMethod,
    ) -> AttributionResult<BTreeMap<String, f64>> {
        let request = AttributionRequest::new(order_id, touchpoints, conversion_value).with_method(method);
        self.compute_attribution(&request).map(|report| report.attribution)
    }

    /// Attribute one order's conversion value across its touchpoints
    ///
    /// Internal failures are logged here with the order id; callers only see
    /// the error variant.
    pub fn compute_attribution(&self, request: &AttributionRequest) -> AttributionResult<AttributionReport> {
        self.compute(request).inspect_err(|err| {
            if let AttributionError::InternalComputation { message } = err {
                process_error!(
                    ProcessId::current(),
                    order_id = %request.order_id,
                    "Attribution failed: {}",
                    message
                );
            }
        })
    }

    fn compute(&self, request: &AttributionRequest) -> AttributionResult<AttributionReport> {
        validate_request(request, &self.config)?;

        let touchpoints = &request.touchpoints;
        let n = touchpoints.len();

        // Degenerate journeys need no combinatorics
        if n <= 1 {
            let attribution = touchpoints
                .iter()
                .map(|tp| (tp.id.clone(), request.conversion_value))
                .collect();
            return Ok(AttributionReport {
                order_id: request.order_id.clone(),
                attribution,
                method_used: MethodUsed::Exact,
                touchpoint_count: n,
                samples: None,
            });
        }

        let method = self.select_method(request, n)?;
        let policy = self.value_function(request.value_policy);
        let context = OrderContext::from_request(request, self.config.time_decay_half_life_hours);
        let game = BoundGame::new(policy.as_ref(), &context);

        process_debug!(
            ProcessId::current(),
            order_id = %request.order_id,
            touchpoints = n,
            policy = policy.name(),
            "Computing attribution with {}",
            method
        );

        let (raw, samples) = match method {
            MethodUsed::Exact => (self.exact.compute(&game)?, None),
            MethodUsed::MonteCarlo => {
                let estimate = self.estimator_for(request).estimate(&game)?;
                if estimate.truncated {
                    process_warn!(
                        ProcessId::current(),
                        order_id = %request.order_id,
                        "Sampling budget reached after {} permutations",
                        estimate.samples
                    );
                }
                (estimate.values, Some(estimate.samples))
            }
        };

        let weights = normalize(&raw, request.conversion_value)?;
        let attribution = touchpoints
            .iter()
            .zip(weights)
            .map(|(tp, weight)| (tp.id.clone(), weight))
            .collect();

        Ok(AttributionReport {
            order_id: request.order_id.clone(),
            attribution,
            method_used: method,
            touchpoint_count: n,
            samples,
        })
    }

    /// Resolve the requested method against the exact-computation threshold
    pub fn select_method(&self, request: &AttributionRequest, n: usize) -> AttributionResult<MethodUsed> {
        match request.method() {
            AttributionMethod::Auto if self.exact.is_feasible(n) => Ok(MethodUsed::Exact),
            AttributionMethod::Auto => Ok(MethodUsed::MonteCarlo),
            AttributionMethod::MonteCarlo => Ok(MethodUsed::MonteCarlo),
            AttributionMethod::Exact if self.exact.is_feasible(n) => Ok(MethodUsed::Exact),
            AttributionMethod::Exact if self.config.downgrade_infeasible_exact => {
                process_warn!(
                    ProcessId::current(),
                    order_id = %request.order_id,
                    "Exact attribution infeasible for {} touchpoints (threshold {}), using monte_carlo",
                    n,
                    self.exact.threshold()
                );
                Ok(MethodUsed::MonteCarlo)
            }
            AttributionMethod::Exact => Err(AttributionError::InfeasibleMethod {
                touchpoints: n,
                threshold: self.exact.threshold(),
            }),
        }
    }

    fn value_function(&self, requested: Option<ValuePolicy>) -> Arc<dyn CoalitionValueFunction> {
        match &self.custom_policy {
            Some(policy) => Arc::clone(policy),
            None => strategies::for_policy(requested.unwrap_or(self.config.value_policy)),
        }
    }

    fn estimator_for(&self, request: &AttributionRequest) -> MonteCarloShapleyEstimator {
        let mut plan = SamplingPlan::from_config(&self.config);
        if let Some(seed) = request.seed {
            plan = plan.with_seed(seed);
        }
        if let Some(iterations) = request.iterations {
            plan.iterations = iterations;
            plan.min_samples = plan.min_samples.min(iterations);
        }
        if let Some(budget_ms) = request.time_budget_ms {
            plan = plan.with_time_budget(Duration::from_millis(budget_ms));
        }
        MonteCarloShapleyEstimator::new(plan)
    }
}
