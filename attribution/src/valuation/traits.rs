//! Coalition valuation trait definitions
//!
//! `Game` is the only view the Shapley computers have of an order. A
//! `CoalitionValueFunction` is the business policy that gets bound to one
//! order's context to produce a `Game`.

use super::types::OrderContext;

/// Characteristic function over `players()` indexed players
///
/// `members` lists the indices present in a coalition. Its order carries no
/// meaning; implementations must treat it as a set.
pub trait Game: Sync {
    fn players(&self) -> usize;

    fn value(&self, members: &[usize]) -> f64;
}

/// Crediting policy that defines `v(S)` for any order
///
/// Implementations must satisfy `v(∅) = 0` and `v(N) = conversion_value`
/// for every order context they are given.
#[mockall::automock]
pub trait CoalitionValueFunction: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Value of the coalition `members` for this order
    fn value(&self, order: &OrderContext, members: &[usize]) -> f64;
}
