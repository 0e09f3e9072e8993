// src/model/distribution.rs

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// A finite probability mass function over positive durations.
///
/// Tables are checked once, at construction, so sampling never fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "DistributionTable", into = "DistributionTable")]
pub struct DiscreteDistribution {
    support: Vec<f64>,
    probabilities: Vec<f64>,
    index: WeightedIndex<f64>,
}

impl PartialEq for DiscreteDistribution {
    fn eq(&self, other: &Self) -> bool {
        self.support == other.support && self.probabilities == other.probabilities
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DistributionTable {
    support: Vec<f64>,
    probabilities: Vec<f64>,
}

impl TryFrom<DistributionTable> for DiscreteDistribution {
    type Error = SimError;

    fn try_from(table: DistributionTable) -> Result<Self, Self::Error> {
        DiscreteDistribution::new(table.support, table.probabilities)
    }
}

impl From<DiscreteDistribution> for DistributionTable {
    fn from(dist: DiscreteDistribution) -> Self {
        Self {
            support: dist.support,
            probabilities: dist.probabilities,
        }
    }
}

impl DiscreteDistribution {
    pub fn new(support: Vec<f64>, probabilities: Vec<f64>) -> Result<Self, SimError> {
        if support.is_empty() {
            return Err(SimError::InvalidDistribution("support is empty".into()));
        }
        if support.len() != probabilities.len() {
            return Err(SimError::InvalidDistribution(format!(
                "support has {} values but {} probabilities were given",
                support.len(),
                probabilities.len()
            )));
        }
        if let Some(bad) = support.iter().find(|v| !v.is_finite() || **v <= 0.0) {
            return Err(SimError::InvalidDistribution(format!(
                "support values must be positive, got {bad}"
            )));
        }
        if let Some(bad) = probabilities.iter().find(|p| !p.is_finite() || **p < 0.0) {
            return Err(SimError::InvalidDistribution(format!(
                "probabilities must be non-negative, got {bad}"
            )));
        }
        let sum: f64 = probabilities.iter().sum();
        if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(SimError::InvalidDistribution(format!(
                "probabilities sum to {sum}, expected 1"
            )));
        }
        let index = WeightedIndex::new(&probabilities)
            .map_err(|e| SimError::InvalidDistribution(e.to_string()))?;

        Ok(Self {
            support,
            probabilities,
            index,
        })
    }

    /// Equal mass on every value of `support`.
    pub fn uniform(support: Vec<f64>) -> Result<Self, SimError> {
        let n = support.len();
        let probabilities = vec![1.0 / n.max(1) as f64; n];
        Self::new(support, probabilities)
    }

    pub fn support(&self) -> &[f64] {
        &self.support
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Expected value of the table.
    pub fn mean(&self) -> f64 {
        self.support
            .iter()
            .zip(&self.probabilities)
            .map(|(v, p)| v * p)
            .sum()
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.support[self.index.sample(rng)]
    }

    /// Draws `count` independent values.
    pub fn sample_n<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<f64> {
        (0..count).map(|_| self.sample(rng)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rejects_length_mismatch() {
        let err = DiscreteDistribution::new(vec![1.0, 2.0], vec![1.0]).unwrap_err();
        assert!(matches!(err, SimError::InvalidDistribution(_)));
    }

    #[test]
    fn rejects_probabilities_not_summing_to_one() {
        assert!(DiscreteDistribution::new(vec![1.0, 2.0], vec![0.5, 0.4]).is_err());
    }

    #[test]
    fn rejects_non_positive_support() {
        assert!(DiscreteDistribution::new(vec![0.0, 2.0], vec![0.5, 0.5]).is_err());
        assert!(DiscreteDistribution::new(vec![], vec![]).is_err());
    }

    #[test]
    fn uniform_table_has_expected_mean() {
        let dist = DiscreteDistribution::uniform(vec![2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!((dist.mean() - 3.5).abs() < 1e-12);
    }

    #[test]
    fn samples_only_values_with_mass() {
        let dist = DiscreteDistribution::new(vec![1.0, 7.0, 9.0], vec![0.0, 1.0, 0.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        assert!(dist.sample_n(50, &mut rng).iter().all(|v| *v == 7.0));
    }

    #[test]
    fn deserializes_and_validates_yaml_tables() {
        let dist: DiscreteDistribution =
            serde_yaml::from_str("support: [2, 3]\nprobabilities: [0.5, 0.5]\n").unwrap();
        assert_eq!(dist.support(), &[2.0, 3.0]);

        let bad: Result<DiscreteDistribution, _> =
            serde_yaml::from_str("support: [2, 3]\nprobabilities: [0.9, 0.5]\n");
        assert!(bad.is_err());
    }
}
