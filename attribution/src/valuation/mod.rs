//! Coalition valuation: traits, types and policies
//!
//! Policies are the only business-specific part of the engine. The Shapley
//! computers see nothing but the `Game` trait.

pub mod strategies;
pub mod traits;
pub mod types;

pub use traits::{CoalitionValueFunction, Game, MockCoalitionValueFunction};
pub use types::{BoundGame, FnGame, OrderContext, TableGame};
