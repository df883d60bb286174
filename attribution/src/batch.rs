//! Batch attribution across many orders
//!
//! Orders are independent, so they are attributed in parallel on the rayon
//! pool. A failing order becomes an error entry; it never aborts the batch.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use rayon::prelude::*;
use shared::{
    AttributionReport, BatchOrder, BatchRequest, BatchResponse, ErrorDescriptor, ErrorKind, Lenient, OrderOutcome,
    ProcessId, process_info,
};

use crate::error::{AttributionError, AttributionResult};
use crate::orchestrator::AttributionOrchestrator;

pub struct BatchAttributionRunner {
    orchestrator: Arc<AttributionOrchestrator>,
}

impl BatchAttributionRunner {
    pub fn new(orchestrator: Arc<AttributionOrchestrator>) -> Self {
        Self { orchestrator }
    }

    pub fn orchestrator(&self) -> &Arc<AttributionOrchestrator> {
        &self.orchestrator
    }

    /// Attribute every order in the batch
    ///
    /// The response holds exactly one entry per distinct requested order id.
    /// An id requested more than once gets a single validation error entry.
    /// A header or journey that does not parse fails only its own order; a
    /// header without a readable id is keyed by its position, `orders[i]`.
    pub fn compute_batch(&self, request: &BatchRequest) -> BatchResponse {
        let keys: Vec<String> = request
            .orders
            .iter()
            .enumerate()
            .map(|(i, order)| order.order_id().map_or_else(|| format!("orders[{i}]"), str::to_string))
            .collect();

        let mut occurrences: HashMap<&str, usize> = HashMap::new();
        for key in &keys {
            *occurrences.entry(key.as_str()).or_default() += 1;
        }

        let mut results: BTreeMap<String, OrderOutcome> = request
            .orders
            .par_iter()
            .zip(keys.par_iter())
            .enumerate()
            .filter(|(_, (_, key))| occurrences[key.as_str()] == 1)
            .map(|(i, (order, key))| {
                let outcome = match self.attribute_entry(request, i, order) {
                    Ok(report) => OrderOutcome::Success(report),
                    Err(err) => OrderOutcome::Error {
                        error: err.descriptor(),
                    },
                };
                (key.clone(), outcome)
            })
            .collect();

        for (order_id, count) in occurrences.into_iter().filter(|(_, count)| *count > 1) {
            results.insert(
                order_id.to_string(),
                OrderOutcome::Error {
                    error: ErrorDescriptor::new(
                        ErrorKind::Validation,
                        format!("order_id '{order_id}' appears {count} times in the batch"),
                    ),
                },
            );
        }

        let response = BatchResponse { results };
        process_info!(
            ProcessId::current(),
            "Batch attributed: {} orders, {} succeeded, {} failed",
            response.results.len(),
            response.success_count(),
            response.error_count()
        );
        response
    }

    fn attribute_entry(
        &self,
        request: &BatchRequest,
        index: usize,
        order: &Lenient<BatchOrder>,
    ) -> AttributionResult<AttributionReport> {
        let order = order
            .resolve()
            .map_err(|e| AttributionError::validation(format!("orders[{index}]"), e.to_string()))?;

        let touchpoints = match request.journeys.get(&order.order_id) {
            Some(journey) => journey
                .resolve()
                .map_err(|e| AttributionError::validation(format!("journeys.{}", order.order_id), e.to_string()))?,
            None => Vec::new(),
        };

        self.orchestrator.compute_attribution(&order.to_request(touchpoints))
    }
}
