//! Proportional crediting policies
//!
//! A coalition earns the share of the conversion value matching its share of
//! a per-touchpoint weight (cost, quality score or recency). These games are
//! additive, so each touchpoint's Shapley value is its own share. When the
//! eligible weights sum to zero the policy falls back to an equal share per
//! eligible touchpoint.

use crate::valuation::traits::CoalitionValueFunction;
use crate::valuation::types::OrderContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Weight {
    Cost,
    Quality,
    Decay,
}

#[derive(Debug, Clone, Copy)]
pub struct ProportionalValue {
    name: &'static str,
    weight: Weight,
}

impl ProportionalValue {
    pub fn cost_weighted() -> Self {
        Self {
            name: "cost_weighted",
            weight: Weight::Cost,
        }
    }

    pub fn quality_weighted() -> Self {
        Self {
            name: "quality_weighted",
            weight: Weight::Quality,
        }
    }

    pub fn time_decay() -> Self {
        Self {
            name: "time_decay",
            weight: Weight::Decay,
        }
    }

    fn weight_of(&self, order: &OrderContext, index: usize) -> f64 {
        match self.weight {
            Weight::Cost => order.cost(index),
            Weight::Quality => order.quality(index),
            Weight::Decay => order.decay(index),
        }
    }

    fn total(&self, order: &OrderContext) -> f64 {
        match self.weight {
            Weight::Cost => order.eligible_cost(),
            Weight::Quality => order.eligible_quality(),
            Weight::Decay => order.eligible_decay(),
        }
    }
}

impl CoalitionValueFunction for ProportionalValue {
    fn name(&self) -> &'static str {
        self.name
    }

    fn value(&self, order: &OrderContext, members: &[usize]) -> f64 {
        if members.is_empty() || order.eligible_count() == 0 {
            return 0.0;
        }

        let total = self.total(order);
        if total > 0.0 && total.is_finite() {
            let share: f64 = members
                .iter()
                .filter(|&&i| order.is_eligible(i))
                .map(|&i| self.weight_of(order, i))
                .sum();
            order.conversion_value() * share / total
        } else {
            let present = members.iter().filter(|&&i| order.is_eligible(i)).count();
            order.conversion_value() * present as f64 / order.eligible_count() as f64
        }
    }
}
