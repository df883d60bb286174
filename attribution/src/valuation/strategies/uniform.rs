//! Uniform crediting policy
//!
//! Any coalition holding at least one eligible touchpoint is worth the full
//! conversion value. Every eligible touchpoint is therefore symmetric and the
//! Shapley split is equal across them.

use crate::valuation::traits::CoalitionValueFunction;
use crate::valuation::types::OrderContext;

#[derive(Debug, Clone, Copy, Default)]
pub struct UniformValue;

impl UniformValue {
    pub fn new() -> Self {
        Self
    }
}

impl CoalitionValueFunction for UniformValue {
    fn name(&self) -> &'static str {
        "uniform"
    }

    fn value(&self, order: &OrderContext, members: &[usize]) -> f64 {
        if members.iter().any(|&i| order.is_eligible(i)) {
            order.conversion_value()
        } else {
            0.0
        }
    }
}
