//! Command line support shared by the binaries
//!
//! `EngineArgs` is flattened into each binary's clap parser so the CLI runner
//! and the web server accept the same engine flags.

use std::fs;
use std::path::Path;

use clap::Args;
use shared::{BatchRequest, BatchResponse, EngineConfig, ValuePolicy};

use crate::batch::BatchAttributionRunner;
use crate::error::AttributionResult;

/// Engine overrides applied on top of the environment configuration
#[derive(Args, Debug, Clone, Default)]
pub struct EngineArgs {
    /// Largest touchpoint count solved exactly
    #[arg(long)]
    pub exact_threshold: Option<usize>,

    /// Monte Carlo permutations per order
    #[arg(long)]
    pub iterations: Option<u64>,

    /// Parallel sampling streams per order
    #[arg(long)]
    pub chunks: Option<usize>,

    /// Seed for reproducible sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Monte Carlo wall-clock budget per order in milliseconds
    #[arg(long)]
    pub time_budget_ms: Option<u64>,

    /// Minimum permutations required when the time budget expires
    #[arg(long)]
    pub min_samples: Option<u64>,

    /// Maximum touchpoints accepted per order
    #[arg(long)]
    pub max_touchpoints: Option<usize>,

    /// Coalition value policy (uniform, cost_weighted, quality_weighted, time_decay)
    #[arg(long)]
    pub value_policy: Option<ValuePolicy>,

    /// Half-life in hours for the time_decay policy
    #[arg(long)]
    pub half_life_hours: Option<f64>,

    /// Run Monte Carlo instead of failing when exact is requested above the threshold
    #[arg(long)]
    pub downgrade_exact: bool,
}

impl EngineArgs {
    /// Overlay these flags on `config` and validate the result
    pub fn apply(&self, mut config: EngineConfig) -> AttributionResult<EngineConfig> {
        if let Some(v) = self.exact_threshold {
            config.exact_threshold = v;
        }
        if let Some(v) = self.iterations {
            config.monte_carlo_iterations = v;
        }
        if let Some(v) = self.chunks {
            config.monte_carlo_chunks = v;
        }
        if let Some(v) = self.seed {
            config.seed = Some(v);
        }
        if let Some(v) = self.time_budget_ms {
            config.monte_carlo_time_budget_ms = Some(v);
        }
        if let Some(v) = self.min_samples {
            config.monte_carlo_min_samples = v;
        }
        if let Some(v) = self.max_touchpoints {
            config.max_touchpoints = v;
        }
        if let Some(v) = self.value_policy {
            config.value_policy = v;
        }
        if let Some(v) = self.half_life_hours {
            config.time_decay_half_life_hours = v;
        }
        if self.downgrade_exact {
            config.downgrade_infeasible_exact = true;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Read a batch request from a JSON file and attribute it
pub fn run_batch_file(path: &Path, runner: &BatchAttributionRunner) -> AttributionResult<BatchResponse> {
    let raw = fs::read_to_string(path)?;
    let request: BatchRequest = serde_json::from_str(&raw)?;
    Ok(runner.compute_batch(&request))
}

/// Serialize a batch response, pretty-printed when requested
pub fn render_response(response: &BatchResponse, pretty: bool) -> AttributionResult<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(response)?
    } else {
        serde_json::to_string(response)?
    };
    Ok(rendered)
}
