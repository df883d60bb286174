//! Monte Carlo Shapley estimation by permutation sampling
//!
//! Each sampled permutation credits every player with its marginal
//! contribution to the players ahead of it. Sampling is split into a fixed
//! number of chunks run on the rayon pool. Chunk seeds are drawn from a
//! `StdRng` seeded with the base seed, so a seeded run is reproducible
//! regardless of scheduling and neighbouring base seeds share no chunk
//! streams. Chunk tallies are merged by summation in chunk
//! order.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use shared::EngineConfig;

use crate::error::{AttributionError, AttributionResult};
use crate::valuation::Game;

/// Sampling parameters for one estimate
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingPlan {
    pub iterations: u64,
    pub chunks: usize,
    pub seed: Option<u64>,
    pub time_budget: Option<Duration>,
    pub min_samples: u64,
}

impl SamplingPlan {
    pub fn new(iterations: u64) -> Self {
        Self {
            iterations,
            chunks: 1,
            seed: None,
            time_budget: None,
            min_samples: 0,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            iterations: config.monte_carlo_iterations,
            chunks: config.monte_carlo_chunks,
            seed: config.seed,
            time_budget: config.time_budget(),
            min_samples: config.monte_carlo_min_samples,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_chunks(mut self, chunks: usize) -> Self {
        self.chunks = chunks;
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    pub fn with_min_samples(mut self, min_samples: u64) -> Self {
        self.min_samples = min_samples;
        self
    }
}

/// Raw per-player means before rescaling
#[derive(Debug, Clone, PartialEq)]
pub struct MonteCarloEstimate {
    pub values: Vec<f64>,
    pub samples: u64,
    /// Sampling stopped at the time budget before all iterations ran
    pub truncated: bool,
}

/// Partial sums from one chunk of permutations
#[derive(Debug, Clone)]
struct Tally {
    sums: Vec<f64>,
    samples: u64,
    truncated: bool,
}

impl Tally {
    fn empty(players: usize) -> Self {
        Self {
            sums: vec![0.0; players],
            samples: 0,
            truncated: false,
        }
    }

    fn merge(mut self, other: Tally) -> Tally {
        for (sum, add) in self.sums.iter_mut().zip(other.sums) {
            *sum += add;
        }
        self.samples += other.samples;
        self.truncated |= other.truncated;
        self
    }
}

#[derive(Debug, Clone)]
pub struct MonteCarloShapleyEstimator {
    plan: SamplingPlan,
}

impl MonteCarloShapleyEstimator {
    pub fn new(plan: SamplingPlan) -> Self {
        Self { plan }
    }

    pub fn plan(&self) -> &SamplingPlan {
        &self.plan
    }

    /// Estimate every player's Shapley value
    pub fn estimate<G>(&self, game: &G) -> AttributionResult<MonteCarloEstimate>
    where
        G: Game + ?Sized,
    {
        let n = game.players();
        if n == 0 {
            return Ok(MonteCarloEstimate {
                values: Vec::new(),
                samples: 0,
                truncated: false,
            });
        }

        let empty_value = game.value(&[]);
        ensure_finite(empty_value, &[])?;

        let base_seed = self.plan.seed.unwrap_or_else(rand::random);
        let deadline = self.plan.time_budget.map(|budget| Instant::now() + budget);
        let chunks = self.plan.chunks.max(1).min(self.plan.iterations.max(1) as usize);
        let per_chunk = self.plan.iterations / chunks as u64;
        let remainder = self.plan.iterations % chunks as u64;
        let seeds = chunk_seeds(base_seed, chunks);

        // Merged in chunk order so float sums do not depend on work stealing
        let tally = (0..chunks)
            .into_par_iter()
            .map(|chunk| {
                let iterations = per_chunk + u64::from((chunk as u64) < remainder);
                sample_chunk(game, n, empty_value, iterations, seeds[chunk], deadline)
            })
            .collect::<AttributionResult<Vec<Tally>>>()?
            .into_iter()
            .fold(Tally::empty(n), Tally::merge);

        if tally.samples == 0 || (tally.truncated && tally.samples < self.plan.min_samples) {
            return Err(AttributionError::ComputationTimeout {
                samples: tally.samples,
                min_samples: self.plan.min_samples.max(1),
            });
        }

        let samples = tally.samples as f64;
        Ok(MonteCarloEstimate {
            values: tally.sums.into_iter().map(|sum| sum / samples).collect(),
            samples: tally.samples,
            truncated: tally.truncated,
        })
    }
}

fn chunk_seeds(base_seed: u64, chunks: usize) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(base_seed);
    (0..chunks).map(|_| rng.next_u64()).collect()
}

fn sample_chunk<G>(
    game: &G,
    n: usize,
    empty_value: f64,
    iterations: u64,
    seed: u64,
    deadline: Option<Instant>,
) -> AttributionResult<Tally>
where
    G: Game + ?Sized,
{
    let mut rng = StdRng::seed_from_u64(seed);
    let mut permutation: Vec<usize> = (0..n).collect();
    let mut tally = Tally::empty(n);

    for _ in 0..iterations {
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            tally.truncated = true;
            break;
        }

        permutation.shuffle(&mut rng);

        let mut previous = empty_value;
        for k in 0..n {
            let prefix = &permutation[..=k];
            let current = game.value(prefix);
            ensure_finite(current, prefix)?;
            tally.sums[permutation[k]] += current - previous;
            previous = current;
        }
        tally.samples += 1;
    }

    Ok(tally)
}

fn ensure_finite(value: f64, members: &[usize]) -> AttributionResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AttributionError::internal(format!(
            "coalition value {value} for members {members:?}"
        )))
    }
}
