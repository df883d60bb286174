//! Configuration types
//!
//! Engine knobs are read from the environment (a `.env` file is honoured)
//! and then overridden by command line flags in each binary.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{SharedError, SharedResult};
use crate::types::ValuePolicy;

/// Largest exact-computation threshold accepted; `2^20` memoized coalitions
pub const MAX_EXACT_THRESHOLD: usize = 20;

pub const DEFAULT_EXACT_THRESHOLD: usize = 10;
pub const DEFAULT_MC_ITERATIONS: u64 = 10_000;
pub const DEFAULT_MC_CHUNKS: usize = 8;
pub const DEFAULT_MAX_TOUCHPOINTS: usize = 500;
pub const DEFAULT_HALF_LIFE_HOURS: f64 = 168.0;

/// Attribution engine configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Largest touchpoint count solved by exact enumeration
    pub exact_threshold: usize,

    pub monte_carlo_iterations: u64,

    /// Fewer samples than this after a time budget expires is a timeout
    pub monte_carlo_min_samples: u64,

    pub monte_carlo_time_budget_ms: Option<u64>,

    /// Independent sampling streams per estimate
    pub monte_carlo_chunks: usize,

    pub seed: Option<u64>,

    pub max_touchpoints: usize,

    /// Run Monte Carlo instead of failing when exact is requested above the threshold
    pub downgrade_infeasible_exact: bool,

    pub value_policy: ValuePolicy,

    pub time_decay_half_life_hours: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            exact_threshold: DEFAULT_EXACT_THRESHOLD,
            monte_carlo_iterations: DEFAULT_MC_ITERATIONS,
            monte_carlo_min_samples: 0,
            monte_carlo_time_budget_ms: None,
            monte_carlo_chunks: DEFAULT_MC_CHUNKS,
            seed: None,
            max_touchpoints: DEFAULT_MAX_TOUCHPOINTS,
            downgrade_infeasible_exact: false,
            value_policy: ValuePolicy::default(),
            time_decay_half_life_hours: DEFAULT_HALF_LIFE_HOURS,
        }
    }
}

impl EngineConfig {
    /// Build a configuration from `ATTRIBUTION_*` environment variables
    ///
    /// Unset variables keep their defaults. Safe to call more than once since
    /// dotenv never overwrites variables that are already set.
    pub fn from_env() -> SharedResult<Self> {
        let _ = dotenv::dotenv();

        let mut config = Self::default();
        if let Some(v) = env_parse("ATTRIBUTION_EXACT_THRESHOLD")? {
            config.exact_threshold = v;
        }
        if let Some(v) = env_parse("ATTRIBUTION_MC_ITERATIONS")? {
            config.monte_carlo_iterations = v;
        }
        if let Some(v) = env_parse("ATTRIBUTION_MC_MIN_SAMPLES")? {
            config.monte_carlo_min_samples = v;
        }
        if let Some(v) = env_parse("ATTRIBUTION_MC_TIME_BUDGET_MS")? {
            config.monte_carlo_time_budget_ms = Some(v);
        }
        if let Some(v) = env_parse("ATTRIBUTION_MC_CHUNKS")? {
            config.monte_carlo_chunks = v;
        }
        if let Some(v) = env_parse("ATTRIBUTION_SEED")? {
            config.seed = Some(v);
        }
        if let Some(v) = env_parse("ATTRIBUTION_MAX_TOUCHPOINTS")? {
            config.max_touchpoints = v;
        }
        if let Some(v) = env_parse("ATTRIBUTION_DOWNGRADE_EXACT")? {
            config.downgrade_infeasible_exact = v;
        }
        if let Some(v) = env_parse("ATTRIBUTION_VALUE_POLICY")? {
            config.value_policy = v;
        }
        if let Some(v) = env_parse("ATTRIBUTION_HALF_LIFE_HOURS")? {
            config.time_decay_half_life_hours = v;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot honour
    pub fn validate(&self) -> SharedResult<()> {
        if self.exact_threshold > MAX_EXACT_THRESHOLD {
            return Err(SharedError::invalid_config("exact_threshold", self.exact_threshold));
        }
        if self.monte_carlo_iterations == 0 {
            return Err(SharedError::invalid_config("monte_carlo_iterations", 0));
        }
        if self.monte_carlo_chunks == 0 {
            return Err(SharedError::invalid_config("monte_carlo_chunks", 0));
        }
        if self.monte_carlo_min_samples > self.monte_carlo_iterations {
            return Err(SharedError::invalid_config(
                "monte_carlo_min_samples",
                self.monte_carlo_min_samples,
            ));
        }
        if self.max_touchpoints == 0 {
            return Err(SharedError::invalid_config("max_touchpoints", 0));
        }
        if !(self.time_decay_half_life_hours.is_finite() && self.time_decay_half_life_hours > 0.0) {
            return Err(SharedError::invalid_config(
                "time_decay_half_life_hours",
                self.time_decay_half_life_hours,
            ));
        }
        Ok(())
    }

    pub fn time_budget(&self) -> Option<Duration> {
        self.monte_carlo_time_budget_ms.map(Duration::from_millis)
    }
}

fn env_parse<T>(key: &str) -> SharedResult<Option<T>>
where
    T: FromStr,
{
    match env::var(key) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| SharedError::invalid_config(key, raw)),
        Err(_) => Ok(None),
    }
}

/// Web server configuration
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct WebServerConfig {
    pub bind_host: String,
    pub bind_port: u16,
    pub engine: EngineConfig,
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self {
            bind_host: "127.0.0.1".to_string(),
            bind_port: 8080,
            engine: EngineConfig::default(),
        }
    }
}
