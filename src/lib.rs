//! Discrete-time simulators for a periodic-review (s, S) inventory policy
//! and a single-server queue, plus a comparator that ranks (s, S) strategies
//! by cost.

pub mod error;
pub mod io;
pub mod model;
pub mod simulation;
pub mod strategy;

pub use error::SimError;
pub use model::customer::Customer;
pub use model::distribution::DiscreteDistribution;
pub use model::policy::{CostModel, DemandSeries, Policy};
pub use simulation::cancel::CancellationToken;
pub use simulation::config::{InventoryConfig, QueueConfig, ShortageAccounting};
pub use simulation::inventory::{
    simulate_inventory, InventoryResult, InventorySimulator, PeriodRecord,
};
pub use simulation::queueing::{
    simulate_queue, QueueMetrics, QueueResult, QueueSimulator, Timeline,
};
pub use strategy::comparator::{StrategyComparator, StrategySummary};
pub use strategy::traits::ReplenishmentPolicy;
