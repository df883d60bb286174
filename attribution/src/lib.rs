//! Multi-touch attribution engine
//!
//! Distributes an order's conversion value across the touchpoints that led
//! to it using Shapley values: exact subset enumeration for short journeys,
//! permutation sampling for long ones. Crediting rules are pluggable
//! `CoalitionValueFunction` policies; the combinatorial code only sees the
//! `Game` trait.

pub mod batch;
pub mod cli;
pub mod core;
pub mod error;
pub mod orchestrator;
pub mod valuation;

// Re-export commonly used types
pub use batch::BatchAttributionRunner;
pub use self::core::{ExactShapleyComputer, MonteCarloEstimate, MonteCarloShapleyEstimator, SamplingPlan};
pub use error::{AttributionError, AttributionResult};
pub use orchestrator::AttributionOrchestrator;
pub use valuation::{BoundGame, CoalitionValueFunction, FnGame, Game, OrderContext, TableGame};
