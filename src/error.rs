// src/error.rs

use thiserror::Error;

/// Input validation failures raised by the simulation engines.
///
/// Every variant is detected before a run's main loop starts, except
/// `Cancelled`, which reports the step at which an external stop was seen.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("invalid policy (s={reorder_point}, S={order_up_to}): {reason}")]
    InvalidPolicy {
        reorder_point: i64,
        order_up_to: i64,
        reason: &'static str,
    },
    #[error("invalid cost model: {0}")]
    InvalidCostModel(String),
    #[error("invalid distribution: {0}")]
    InvalidDistribution(String),
    #[error("unstable system: traffic intensity rho={rho:.4} must be below 1")]
    UnstableSystem { rho: f64 },
    #[error("demand series has {actual} periods, expected {expected}")]
    MismatchedSeriesLength { expected: usize, actual: usize },
    #[error("invalid queue configuration: {0}")]
    InvalidQueueConfig(String),
    #[error("policy (s={reorder_point}, S={order_up_to}) listed more than once")]
    DuplicatePolicy { reorder_point: u32, order_up_to: u32 },
    #[error("workload too large: {what} is {requested}, limit is {limit}")]
    WorkloadTooLarge {
        what: &'static str,
        requested: usize,
        limit: usize,
    },
    #[error("simulation cancelled at step {step}")]
    Cancelled { step: usize },
}
