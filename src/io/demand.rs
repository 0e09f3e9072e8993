// src/io/demand.rs

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::model::policy::DemandSeries;

/// The twelve-period demand used by the strategy comparison dashboard.
pub const REFERENCE_DEMAND: [u32; 12] = [15, 45, 15, 20, 15, 30, 45, 50, 10, 15, 20, 30];

pub fn reference_demand() -> DemandSeries {
    DemandSeries::from(REFERENCE_DEMAND.to_vec())
}

/// Generates a demand schedule where every period has the exact same amount.
/// Useful for checking that a policy settles into a steady cycle.
pub fn generate_constant_demand(periods: usize, value: u32) -> DemandSeries {
    DemandSeries::from(vec![value; periods])
}

/// Generates a demand schedule based on a Normal (Bell Curve) distribution.
///
/// # Arguments
/// * `periods` - Length of the simulation.
/// * `mean` - The average demand per period (e.g., 25.0).
/// * `std_dev` - The standard deviation (volatility) (e.g., 10.0).
/// * `seed` - Seed for the generator; the same seed gives the same series.
pub fn generate_normal_demand(
    periods: usize,
    mean: f64,
    std_dev: f64,
    seed: u64,
) -> Result<DemandSeries, SimError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(mean, std_dev)
        .map_err(|e| SimError::InvalidDistribution(format!("normal demand: {e}")))?;

    let schedule = (0..periods)
        .map(|_| {
            // Round to the nearest unit; demand cannot be negative.
            let val: f64 = normal.sample(&mut rng).round();
            if val < 0.0 {
                0
            } else {
                val as u32
            }
        })
        .collect();

    Ok(DemandSeries::new(schedule))
}

/// Demand as written in a scenario: either an explicit series or a
/// generator.
///
/// ```yaml
/// demand: [15, 45, 15]
/// # or
/// demand: { normal: { periods: 24, mean: 25.0, std_dev: 10.0, seed: 7 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DemandSource {
    Series(DemandSeries),
    Generated(DemandGenerator),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandGenerator {
    Constant {
        periods: usize,
        value: u32,
    },
    Normal {
        periods: usize,
        mean: f64,
        std_dev: f64,
        #[serde(default)]
        seed: u64,
    },
}

impl DemandSource {
    pub fn series(&self) -> Result<DemandSeries, SimError> {
        match self {
            DemandSource::Series(series) => Ok(series.clone()),
            DemandSource::Generated(DemandGenerator::Constant { periods, value }) => {
                Ok(generate_constant_demand(*periods, *value))
            }
            DemandSource::Generated(DemandGenerator::Normal {
                periods,
                mean,
                std_dev,
                seed,
            }) => generate_normal_demand(*periods, *mean, *std_dev, *seed),
        }
    }
}
