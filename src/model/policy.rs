// src/model/policy.rs

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::strategy::traits::ReplenishmentPolicy;

/// A periodic-review (s, S) rule: whenever the stock left after demand falls
/// to or below `s`, order enough to bring it back up to `S`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PolicySpec")]
pub struct Policy {
    reorder_point: u32,
    order_up_to: u32,
}

// Accepts both the long names and the textbook `s` / `S` keys in YAML.
#[derive(Deserialize)]
struct PolicySpec {
    #[serde(alias = "s")]
    reorder_point: i64,
    #[serde(alias = "S")]
    order_up_to: i64,
}

impl TryFrom<PolicySpec> for Policy {
    type Error = SimError;

    fn try_from(spec: PolicySpec) -> Result<Self, Self::Error> {
        Policy::new(spec.reorder_point, spec.order_up_to)
    }
}

impl Policy {
    /// Builds a policy, rejecting negative levels and `S < s`.
    pub fn new(reorder_point: i64, order_up_to: i64) -> Result<Self, SimError> {
        let invalid = |reason| SimError::InvalidPolicy {
            reorder_point,
            order_up_to,
            reason,
        };

        if reorder_point < 0 || order_up_to < 0 {
            return Err(invalid("levels must be non-negative"));
        }
        if order_up_to < reorder_point {
            return Err(invalid("order-up-to level S must be at least s"));
        }
        let s = u32::try_from(reorder_point).map_err(|_| invalid("s exceeds u32 range"))?;
        let big_s = u32::try_from(order_up_to).map_err(|_| invalid("S exceeds u32 range"))?;

        Ok(Self {
            reorder_point: s,
            order_up_to: big_s,
        })
    }

    pub fn reorder_point(&self) -> u32 {
        self.reorder_point
    }

    pub fn order_up_to(&self) -> u32 {
        self.order_up_to
    }
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(s={}, S={})", self.reorder_point, self.order_up_to)
    }
}

impl ReplenishmentPolicy for Policy {
    fn review(&self, net_stock: i64) -> Option<u64> {
        // Measured against the unclamped stock, so a deficit is ordered too.
        (net_stock <= self.reorder_point as i64)
            .then(|| (self.order_up_to as i64 - net_stock) as u64)
    }

    fn opening_stock(&self) -> u32 {
        self.order_up_to
    }
}

/// Unit costs charged by the inventory simulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    /// Cost per unit held at the end of a period (h).
    pub holding: f64,
    /// Cost per unit short in a period (p).
    pub shortage: f64,
    /// Fixed cost per replenishment order (L).
    pub ordering: f64,
}

impl CostModel {
    pub fn new(holding: f64, shortage: f64, ordering: f64) -> Result<Self, SimError> {
        let costs = Self {
            holding,
            shortage,
            ordering,
        };
        costs.validate()?;
        Ok(costs)
    }

    /// Rejects negative or non-finite unit costs.
    pub fn validate(&self) -> Result<(), SimError> {
        for (name, value) in [
            ("holding", self.holding),
            ("shortage", self.shortage),
            ("ordering", self.ordering),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::InvalidCostModel(format!(
                    "{name} cost must be a finite non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            holding: 2.0,
            shortage: 5.0,
            ordering: 220.0,
        }
    }
}

/// Per-period customer demand, fixed before a run starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DemandSeries(Vec<u32>);

impl DemandSeries {
    pub fn new(values: Vec<u32>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.0.iter().map(|&d| d as u64).sum()
    }
}

impl From<Vec<u32>> for DemandSeries {
    fn from(values: Vec<u32>) -> Self {
        Self::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_rejects_order_up_to_below_reorder_point() {
        let err = Policy::new(40, 10).unwrap_err();
        assert!(matches!(err, SimError::InvalidPolicy { .. }));
    }

    #[test]
    fn policy_rejects_negative_levels() {
        assert!(Policy::new(-1, 10).is_err());
        assert!(Policy::new(0, -5).is_err());
    }

    #[test]
    fn policy_orders_up_to_s_including_deficit() {
        let policy = Policy::new(10, 40).unwrap();
        assert_eq!(policy.review(25), None);
        assert_eq!(policy.review(10), Some(30));
        assert_eq!(policy.review(-20), Some(60));
    }

    #[test]
    fn policy_deserializes_from_short_keys() {
        let policy: Policy = serde_yaml::from_str("s: 20\nS: 60\n").unwrap();
        assert_eq!(policy, Policy::new(20, 60).unwrap());

        let bad: Result<Policy, _> = serde_yaml::from_str("s: 60\nS: 20\n");
        assert!(bad.is_err());
    }

    #[test]
    fn cost_model_rejects_negative_costs() {
        assert!(CostModel::new(2.0, -5.0, 23.0).is_err());
        assert!(CostModel::new(f64::NAN, 5.0, 23.0).is_err());
        assert!(CostModel::new(0.0, 0.0, 0.0).is_ok());
    }

    #[test]
    fn demand_series_totals() {
        let demand = DemandSeries::from(vec![15, 45, 15]);
        assert_eq!(demand.len(), 3);
        assert_eq!(demand.total(), 75);
    }
}
