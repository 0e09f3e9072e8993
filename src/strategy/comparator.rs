// src/strategy/comparator.rs

use std::collections::HashSet;

use rayon::prelude::*;
use serde::Serialize;

use crate::error::SimError;
use crate::model::policy::{DemandSeries, Policy};
use crate::simulation::inventory::{InventoryResult, InventorySimulator};

/// One row of the strategy comparison table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategySummary {
    pub policy: Policy,
    /// Sum of the running total cost over all periods.
    pub total_cost: f64,
    pub average_cost_per_period: f64,
    /// Stock-out periods as counted under the run's shortage accounting.
    pub shortage_period_count: usize,
    /// Share of total demand served from stock.
    pub service_level: f64,
}

impl StrategySummary {
    fn from_run(policy: Policy, result: &InventoryResult) -> Self {
        Self {
            policy,
            total_cost: result.total_cost(),
            average_cost_per_period: result.average_cost_per_period(),
            shortage_period_count: result.shortage_period_count(),
            service_level: result.service_level(),
        }
    }
}

/// Runs every candidate policy on the same demand and ranks them by cost.
#[derive(Debug, Clone, Default)]
pub struct StrategyComparator {
    simulator: InventorySimulator,
}

impl StrategyComparator {
    pub fn new(simulator: InventorySimulator) -> Self {
        Self { simulator }
    }

    /// Rows sorted ascending by total cost. Ties keep input order.
    ///
    /// Runs are independent, so they fan out across the rayon pool; results
    /// are collected in input order before the stable sort.
    pub fn compare(
        &self,
        policies: &[Policy],
        demand: &DemandSeries,
    ) -> Result<Vec<StrategySummary>, SimError> {
        let mut seen = HashSet::with_capacity(policies.len());
        for policy in policies {
            if !seen.insert(*policy) {
                return Err(SimError::DuplicatePolicy {
                    reorder_point: policy.reorder_point(),
                    order_up_to: policy.order_up_to(),
                });
            }
        }

        let mut rows = policies
            .par_iter()
            .map(|policy| {
                self.simulator
                    .run(policy, demand)
                    .map(|result| StrategySummary::from_run(*policy, &result))
            })
            .collect::<Result<Vec<_>, SimError>>()?;

        rows.sort_by(|a, b| a.total_cost.total_cmp(&b.total_cost));

        if let Some(best) = rows.first() {
            tracing::info!(
                candidates = rows.len(),
                best = %best.policy,
                total_cost = best.total_cost,
                "strategy comparison complete"
            );
        }
        Ok(rows)
    }

    /// The cheapest policy, if any were given.
    pub fn best(
        &self,
        policies: &[Policy],
        demand: &DemandSeries,
    ) -> Result<Option<StrategySummary>, SimError> {
        Ok(self.compare(policies, demand)?.into_iter().next())
    }
}
