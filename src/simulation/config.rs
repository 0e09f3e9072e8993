// src/simulation/config.rs

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::model::distribution::DiscreteDistribution;
use crate::model::policy::{CostModel, Policy};

/// (s, S) levels of the built-in strategy set.
pub const REFERENCE_STRATEGIES: [(u32, u32); 4] = [(10, 40), (20, 60), (30, 70), (40, 80)];

/// How the shortage penalty is measured within a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortageAccounting {
    /// Charge the deficit left by demand, before the replenishment order
    /// restores the stock. A demand spike above S is always penalised.
    #[default]
    PreReplenishment,
    /// Charge only what is still negative after the replenishment decision.
    /// With s >= 0 an order always fires first, so no shortage is ever charged.
    Reference,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    pub costs: CostModel,
    /// Stock before the first period. Defaults to the policy's S.
    pub initial_stock: Option<u32>,
    /// Expected number of periods. When set, the demand series must match it.
    pub periods: Option<usize>,
    pub shortage_accounting: ShortageAccounting,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    pub num_customers: usize,
    pub horizon: f64,
    pub sample_step: f64,
    pub seed: u64,
    pub max_customers: usize,
    pub max_timeline_samples: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            num_customers: 20,
            horizon: 100.0,
            sample_step: 0.1,
            seed: 42,
            max_customers: 1_000_000,
            max_timeline_samples: 20_000_000,
        }
    }
}

impl QueueConfig {
    /// Number of sample instants in `[0, horizon)` spaced `sample_step` apart.
    pub fn timeline_len(&self) -> usize {
        (self.horizon / self.sample_step).ceil() as usize
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.num_customers == 0 {
            return Err(SimError::InvalidQueueConfig(
                "number of customers must be greater than zero".into(),
            ));
        }
        if !self.horizon.is_finite() || self.horizon <= 0.0 {
            return Err(SimError::InvalidQueueConfig(format!(
                "horizon must be positive, got {}",
                self.horizon
            )));
        }
        if !self.sample_step.is_finite() || self.sample_step <= 0.0 {
            return Err(SimError::InvalidQueueConfig(format!(
                "sample step must be positive, got {}",
                self.sample_step
            )));
        }
        if self.num_customers > self.max_customers {
            return Err(SimError::WorkloadTooLarge {
                what: "customer count",
                requested: self.num_customers,
                limit: self.max_customers,
            });
        }
        let samples = (self.horizon / self.sample_step).ceil();
        if samples > self.max_timeline_samples as f64 {
            return Err(SimError::WorkloadTooLarge {
                what: "timeline length",
                requested: samples.min(usize::MAX as f64) as usize,
                limit: self.max_timeline_samples,
            });
        }
        Ok(())
    }
}

/// The candidate strategies compared by default.
pub fn reference_strategies() -> Vec<Policy> {
    REFERENCE_STRATEGIES
        .iter()
        .filter_map(|&(s, big_s)| Policy::new(s as i64, big_s as i64).ok())
        .collect()
}

/// Inter-arrival times 1..=10, equally likely.
pub fn reference_arrivals() -> Result<DiscreteDistribution, SimError> {
    DiscreteDistribution::uniform((1..=10).map(f64::from).collect())
}

/// Service durations 2..=5, equally likely.
pub fn reference_service() -> Result<DiscreteDistribution, SimError> {
    DiscreteDistribution::uniform((2..=5).map(f64::from).collect())
}
