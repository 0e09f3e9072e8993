// src/strategy/traits.rs

use std::fmt::Debug;

/// Defines the replenishment decision taken at each periodic review.
///
/// We require `Send` + `Sync` so the comparator can evaluate policies in
/// parallel.
pub trait ReplenishmentPolicy: Debug + Send + Sync {
    /// Decides whether to place an order this period and for how much.
    ///
    /// Returns `Some(quantity)` when an order is placed (the fixed ordering
    /// cost is charged even for a zero quantity) and `None` otherwise.
    ///
    /// # Arguments
    /// * `net_stock` - Stock left after this period's demand, before any
    ///   clamping. Negative values are an unmet deficit.
    fn review(&self, net_stock: i64) -> Option<u64>;

    /// Stock on hand before the first period when the caller supplies none.
    fn opening_stock(&self) -> u32;
}
