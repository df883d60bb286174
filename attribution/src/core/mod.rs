//! Core computation modules
//!
//! Pure, CPU-bound building blocks with no I/O. Every function is a
//! deterministic function of its inputs (given a seed for sampling).

pub mod exact;
pub mod monte_carlo;
pub mod normalize;
pub mod validation;

pub use exact::ExactShapleyComputer;
pub use monte_carlo::{MonteCarloEstimate, MonteCarloShapleyEstimator, SamplingPlan};
pub use normalize::normalize;
pub use validation::validate_request;
