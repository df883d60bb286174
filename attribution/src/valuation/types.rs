//! Valuation data types
//!
//! `OrderContext` holds one order's touchpoints together with the features
//! every policy needs (eligibility, recency decay), computed once per order.
//! The `Game` implementations here adapt policies, lookup tables and
//! closures to the interface the Shapley computers consume.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use shared::messages::config::DEFAULT_HALF_LIFE_HOURS;
use shared::{AttributionRequest, Touchpoint};

use super::traits::{CoalitionValueFunction, Game};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Immutable per-order input to a coalition value function
#[derive(Debug, Clone)]
pub struct OrderContext {
    order_id: String,
    conversion_value: f64,
    touchpoints: Vec<Touchpoint>,
    eligible: Vec<bool>,
    eligible_count: usize,
    decay: Vec<f64>,
    eligible_cost: f64,
    eligible_quality: f64,
    eligible_decay: f64,
}

impl OrderContext {
    pub fn new(order_id: impl Into<String>, conversion_value: f64, touchpoints: Vec<Touchpoint>) -> Self {
        Self::build(order_id.into(), conversion_value, touchpoints, None, DEFAULT_HALF_LIFE_HOURS)
    }

    pub fn from_request(request: &AttributionRequest, half_life_hours: f64) -> Self {
        Self::build(
            request.order_id.clone(),
            request.conversion_value,
            request.touchpoints.clone(),
            request.converted_at,
            half_life_hours,
        )
    }

    fn build(
        order_id: String,
        conversion_value: f64,
        touchpoints: Vec<Touchpoint>,
        converted_at: Option<DateTime<Utc>>,
        half_life_hours: f64,
    ) -> Self {
        let eligible: Vec<bool> = touchpoints
            .iter()
            .map(|tp| converted_at.is_none_or(|at| tp.timestamp <= at))
            .collect();
        let eligible_count = eligible.iter().filter(|e| **e).count();

        // Age is measured back from the conversion, or from the latest touchpoint
        let reference = converted_at.or_else(|| touchpoints.iter().map(|tp| tp.timestamp).max());
        let decay = touchpoints
            .iter()
            .map(|tp| match reference {
                Some(reference) => {
                    let age_hours = (reference - tp.timestamp).num_milliseconds().max(0) as f64 / MILLIS_PER_HOUR;
                    (-age_hours / half_life_hours).exp2()
                }
                None => 1.0,
            })
            .collect::<Vec<f64>>();

        let eligible_sum = |weight: &dyn Fn(usize) -> f64| -> f64 {
            (0..touchpoints.len()).filter(|&i| eligible[i]).map(weight).sum()
        };
        let eligible_cost = eligible_sum(&|i| touchpoints[i].cost);
        let eligible_quality = eligible_sum(&|i| touchpoints[i].quality_score.unwrap_or(1.0));
        let eligible_decay = eligible_sum(&|i| decay[i]);

        Self {
            order_id,
            conversion_value,
            touchpoints,
            eligible,
            eligible_count,
            decay,
            eligible_cost,
            eligible_quality,
            eligible_decay,
        }
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn conversion_value(&self) -> f64 {
        self.conversion_value
    }

    pub fn len(&self) -> usize {
        self.touchpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.touchpoints.is_empty()
    }

    /// Whether the touchpoint happened no later than the conversion
    pub fn is_eligible(&self, index: usize) -> bool {
        self.eligible.get(index).copied().unwrap_or(false)
    }

    pub fn eligible_count(&self) -> usize {
        self.eligible_count
    }

    pub fn cost(&self, index: usize) -> f64 {
        self.touchpoints.get(index).map_or(0.0, |tp| tp.cost)
    }

    /// Quality score, with unscored touchpoints counting as 1.0
    pub fn quality(&self, index: usize) -> f64 {
        self.touchpoints
            .get(index)
            .map_or(0.0, |tp| tp.quality_score.unwrap_or(1.0))
    }

    /// Total cost of eligible touchpoints
    pub fn eligible_cost(&self) -> f64 {
        self.eligible_cost
    }

    pub fn eligible_quality(&self) -> f64 {
        self.eligible_quality
    }

    pub fn eligible_decay(&self) -> f64 {
        self.eligible_decay
    }

    /// Recency weight in `(0, 1]`; halves every half-life before the reference time
    pub fn decay(&self, index: usize) -> f64 {
        self.decay.get(index).copied().unwrap_or(0.0)
    }
}

/// A policy bound to one order
pub struct BoundGame<'a> {
    policy: &'a dyn CoalitionValueFunction,
    order: &'a OrderContext,
}

impl<'a> BoundGame<'a> {
    pub fn new(policy: &'a dyn CoalitionValueFunction, order: &'a OrderContext) -> Self {
        Self { policy, order }
    }
}

impl Game for BoundGame<'_> {
    fn players(&self) -> usize {
        self.order.len()
    }

    fn value(&self, members: &[usize]) -> f64 {
        self.policy.value(self.order, members)
    }
}

/// Game defined by an explicit table of coalition values
///
/// Coalitions missing from the table are worth 0. Supports up to 64 players.
#[derive(Debug, Clone, Default)]
pub struct TableGame {
    players: usize,
    values: HashMap<u64, f64>,
}

impl TableGame {
    pub fn new(players: usize) -> Self {
        Self {
            players: players.min(64),
            values: HashMap::new(),
        }
    }

    pub fn with(mut self, members: &[usize], value: f64) -> Self {
        self.values.insert(Self::mask(members), value);
        self
    }

    fn mask(members: &[usize]) -> u64 {
        members
            .iter()
            .filter(|&&i| i < 64)
            .fold(0u64, |mask, &i| mask | (1u64 << i))
    }
}

impl Game for TableGame {
    fn players(&self) -> usize {
        self.players
    }

    fn value(&self, members: &[usize]) -> f64 {
        self.values.get(&Self::mask(members)).copied().unwrap_or(0.0)
    }
}

/// Game backed by a closure
pub struct FnGame<F> {
    players: usize,
    f: F,
}

impl<F> FnGame<F>
where
    F: Fn(&[usize]) -> f64 + Sync,
{
    pub fn new(players: usize, f: F) -> Self {
        Self { players, f }
    }
}

impl<F> Game for FnGame<F>
where
    F: Fn(&[usize]) -> f64 + Sync,
{
    fn players(&self) -> usize {
        self.players
    }

    fn value(&self, members: &[usize]) -> f64 {
        (self.f)(members)
    }
}
