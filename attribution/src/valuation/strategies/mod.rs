//! Concrete coalition value policies
//!
//! Each policy implements the CoalitionValueFunction trait.

pub mod proportional;
pub mod uniform;

pub use proportional::ProportionalValue;
pub use uniform::UniformValue;

use std::sync::Arc;

use shared::ValuePolicy;

use super::traits::CoalitionValueFunction;

/// Policy implementation for a configured policy name
pub fn for_policy(policy: ValuePolicy) -> Arc<dyn CoalitionValueFunction> {
    match policy {
        ValuePolicy::Uniform => Arc::new(UniformValue::new()),
        ValuePolicy::CostWeighted => Arc::new(ProportionalValue::cost_weighted()),
        ValuePolicy::QualityWeighted => Arc::new(ProportionalValue::quality_weighted()),
        ValuePolicy::TimeDecay => Arc::new(ProportionalValue::time_decay()),
    }
}
