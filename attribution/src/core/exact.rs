//! Exact Shapley values by subset enumeration
//!
//! Every one of the `2^n` coalition values is evaluated once into a bitmask
//! indexed memo, then each coalition `S` contributes
//! `|S|!(n-|S|-1)!/n! * (v(S ∪ {i}) - v(S))` to every player `i` outside it.
//! Cost is `O(n * 2^n)` time and `O(2^n)` memory, so the player count is
//! bounded by a threshold.

use shared::messages::config::MAX_EXACT_THRESHOLD;

use crate::error::{AttributionError, AttributionResult};
use crate::valuation::Game;

#[derive(Debug, Clone, Copy)]
pub struct ExactShapleyComputer {
    threshold: usize,
}

impl ExactShapleyComputer {
    /// Threshold is clamped to the engine-wide limit
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold: threshold.min(MAX_EXACT_THRESHOLD),
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn is_feasible(&self, players: usize) -> bool {
        players <= self.threshold
    }

    /// Shapley value of every player, indexed like the game's players
    pub fn compute<G>(&self, game: &G) -> AttributionResult<Vec<f64>>
    where
        G: Game + ?Sized,
    {
        let n = game.players();
        if !self.is_feasible(n) {
            return Err(AttributionError::InfeasibleMethod {
                touchpoints: n,
                threshold: self.threshold,
            });
        }
        if n == 0 {
            return Ok(Vec::new());
        }

        let values = coalition_values(game, n)?;
        let coefficients = shapley_coefficients(n);
        let full = (1usize << n) - 1;

        let mut shapley = vec![0.0; n];
        for mask in 0..full {
            let weight = coefficients[mask.count_ones() as usize];
            let base = values[mask];
            for (player, phi) in shapley.iter_mut().enumerate() {
                let bit = 1usize << player;
                if mask & bit == 0 {
                    *phi += weight * (values[mask | bit] - base);
                }
            }
        }

        Ok(shapley)
    }
}

/// Memo of `v(S)` for every coalition, indexed by membership bitmask
fn coalition_values<G>(game: &G, n: usize) -> AttributionResult<Vec<f64>>
where
    G: Game + ?Sized,
{
    let count = 1usize << n;
    let mut values = Vec::with_capacity(count);
    let mut members = Vec::with_capacity(n);

    for mask in 0..count {
        members.clear();
        members.extend((0..n).filter(|&i| mask & (1usize << i) != 0));

        let value = game.value(&members);
        if !value.is_finite() {
            return Err(AttributionError::internal(format!(
                "coalition value {value} for members {members:?}"
            )));
        }
        values.push(value);
    }

    Ok(values)
}

/// `|S|!(n-|S|-1)!/n!` for every coalition size `|S|` in `0..n`
///
/// Computed as `1 / (n * C(n-1, s))` to stay clear of factorial overflow.
fn shapley_coefficients(n: usize) -> Vec<f64> {
    let mut coefficients = Vec::with_capacity(n);
    let mut binomial = 1.0_f64;
    for s in 0..n {
        coefficients.push(1.0 / (n as f64 * binomial));
        binomial = binomial * (n - 1 - s) as f64 / (s + 1) as f64;
    }
    coefficients
}
