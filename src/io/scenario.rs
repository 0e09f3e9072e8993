// src/io/scenario.rs

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::SimError;
use crate::io::demand::{reference_demand, DemandSource};
use crate::model::distribution::DiscreteDistribution;
use crate::model::policy::{DemandSeries, Policy};
use crate::simulation::config::{
    reference_arrivals, reference_service, reference_strategies, InventoryConfig, QueueConfig,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read scenario file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse scenario yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Inputs for both simulators. Every section is optional; missing ones fall
/// back to the reference dashboards' values.
///
/// ```yaml
/// demand: [15, 45, 15, 20]    # or { normal: { periods, mean, std_dev, seed } }
/// strategies:
///   - { s: 10, S: 40 }
/// inventory:
///   costs: { holding: 2.0, shortage: 5.0, ordering: 23.0 }
/// queue:
///   num_customers: 50
///   seed: 7
/// service:
///   support: [2, 3]
///   probabilities: [0.5, 0.5]
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub demand: Option<DemandSource>,
    pub strategies: Vec<Policy>,
    pub inventory: InventoryConfig,
    pub queue: QueueConfig,
    pub arrivals: Option<DiscreteDistribution>,
    pub service: Option<DiscreteDistribution>,
}

impl Scenario {
    pub fn demand(&self) -> Result<DemandSeries, SimError> {
        match &self.demand {
            Some(source) => source.series(),
            None => Ok(reference_demand()),
        }
    }

    pub fn strategies(&self) -> Vec<Policy> {
        if self.strategies.is_empty() {
            reference_strategies()
        } else {
            self.strategies.clone()
        }
    }

    pub fn arrivals(&self) -> Result<DiscreteDistribution, SimError> {
        match &self.arrivals {
            Some(dist) => Ok(dist.clone()),
            None => reference_arrivals(),
        }
    }

    pub fn service(&self) -> Result<DiscreteDistribution, SimError> {
        match &self.service {
            Some(dist) => Ok(dist.clone()),
            None => reference_service(),
        }
    }
}

pub fn parse_scenario(yaml: &str) -> Result<Scenario, ConfigError> {
    Ok(serde_yaml::from_str(yaml)?)
}

pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<Scenario, ConfigError> {
    let yaml = std::fs::read_to_string(path.as_ref())?;
    let scenario = parse_scenario(&yaml)?;
    tracing::debug!(path = %path.as_ref().display(), "scenario loaded");
    Ok(scenario)
}
