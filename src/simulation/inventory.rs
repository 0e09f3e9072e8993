// src/simulation/inventory.rs

use serde::Serialize;

use crate::error::SimError;
use crate::model::policy::{CostModel, DemandSeries};
use crate::simulation::cancel::{self, CancellationToken};
use crate::simulation::config::{InventoryConfig, ShortageAccounting};
use crate::strategy::traits::ReplenishmentPolicy;

/// One row of the inventory trace. Serialize so it can be written to CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodRecord {
    pub period: usize,
    pub demand: u32,
    /// Stock left after demand, before replenishment or clamping.
    pub net_stock: i64,
    /// Closing stock for the period: restored to S on reorder, never negative.
    pub stock_after_demand: u64,
    pub order_quantity: u64,
    /// Units charged as shortage this period.
    pub shortage_units: u64,
    pub running_holding_cost: f64,
    pub running_shortage_cost: f64,
    pub running_ordering_cost: f64,
    pub running_total_cost: f64,
}

/// Full trace of one inventory run plus its final cost totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryResult {
    pub records: Vec<PeriodRecord>,
    pub holding_cost: f64,
    pub shortage_cost: f64,
    pub ordering_cost: f64,
    pub total_demand: u64,
    /// Accounting mode the run was charged under.
    pub shortage_accounting: ShortageAccounting,
}

impl InventoryResult {
    /// Holding + shortage + ordering cost at the end of the horizon.
    pub fn final_cost(&self) -> f64 {
        self.holding_cost + self.shortage_cost + self.ordering_cost
    }

    /// Sum of the running total cost over every period. This is the figure
    /// strategies are ranked by.
    pub fn total_cost(&self) -> f64 {
        self.records.iter().map(|r| r.running_total_cost).sum()
    }

    pub fn average_cost_per_period(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        self.total_cost() / self.records.len() as f64
    }

    /// Periods that ran out of stock. Under `PreReplenishment` that is any
    /// period whose demand drove the stock to zero or below; under
    /// `Reference` only closing stock of zero counts.
    pub fn shortage_period_count(&self) -> usize {
        let hit_floor: fn(&PeriodRecord) -> bool = match self.shortage_accounting {
            ShortageAccounting::PreReplenishment => |r| r.net_stock <= 0,
            ShortageAccounting::Reference => |r| r.stock_after_demand == 0,
        };
        self.records.iter().filter(|r| hit_floor(r)).count()
    }

    pub fn unmet_demand(&self) -> u64 {
        self.records.iter().map(|r| r.shortage_units).sum()
    }

    /// Share of demand served from stock. An all-zero demand series is fully served.
    pub fn service_level(&self) -> f64 {
        if self.total_demand == 0 {
            return 1.0;
        }
        let unmet = self.unmet_demand().min(self.total_demand);
        (self.total_demand - unmet) as f64 / self.total_demand as f64
    }
}

/// Cumulative costs threaded through the period fold.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct CostLedger {
    holding: f64,
    shortage: f64,
    ordering: f64,
}

impl CostLedger {
    fn total(&self) -> f64 {
        self.holding + self.shortage + self.ordering
    }
}

/// State carried from one period into the next.
#[derive(Debug, Clone, Copy)]
struct PeriodState {
    stock: i64,
    ledger: CostLedger,
}

/// What happened in a single review, before costs are applied.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ReviewOutcome {
    net_stock: i64,
    order: Option<u64>,
    shortage_units: u64,
    closing_stock: u64,
}

/// The two-phase step: demand leaves a pre-clamp stock, then the
/// replenishment and shortage branches are evaluated against it.
fn review_period<P: ReplenishmentPolicy + ?Sized>(
    policy: &P,
    stock: i64,
    demand: u32,
    accounting: ShortageAccounting,
) -> ReviewOutcome {
    let net_stock = stock - demand as i64;

    let order = policy.review(net_stock);
    let replenished = match order {
        Some(quantity) => net_stock + quantity as i64,
        None => net_stock,
    };

    let shortage_basis = match accounting {
        ShortageAccounting::PreReplenishment => net_stock,
        ShortageAccounting::Reference => replenished,
    };
    let shortage_units = (-shortage_basis).max(0) as u64;

    ReviewOutcome {
        net_stock,
        order,
        shortage_units,
        closing_stock: replenished.max(0) as u64,
    }
}

impl PeriodState {
    fn advance(self, outcome: &ReviewOutcome, costs: &CostModel) -> Self {
        let ordering = if outcome.order.is_some() {
            costs.ordering
        } else {
            0.0
        };
        Self {
            stock: outcome.closing_stock as i64,
            ledger: CostLedger {
                holding: self.ledger.holding + outcome.closing_stock as f64 * costs.holding,
                shortage: self.ledger.shortage + outcome.shortage_units as f64 * costs.shortage,
                ordering: self.ledger.ordering + ordering,
            },
        }
    }
}

/// Runs a replenishment policy over a demand series and accounts its costs.
#[derive(Debug, Clone, Default)]
pub struct InventorySimulator {
    config: InventoryConfig,
    cancel: Option<CancellationToken>,
}

impl InventorySimulator {
    pub fn new(config: InventoryConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    /// Polls `token` between periods and stops with `SimError::Cancelled`.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    pub fn run<P: ReplenishmentPolicy + ?Sized>(
        &self,
        policy: &P,
        demand: &DemandSeries,
    ) -> Result<InventoryResult, SimError> {
        self.config.costs.validate()?;
        if let Some(expected) = self.config.periods {
            if demand.len() != expected {
                return Err(SimError::MismatchedSeriesLength {
                    expected,
                    actual: demand.len(),
                });
            }
        }

        let opening = self
            .config
            .initial_stock
            .unwrap_or_else(|| policy.opening_stock());
        tracing::debug!(?policy, periods = demand.len(), opening, "running inventory simulation");

        let start = PeriodState {
            stock: opening as i64,
            ledger: CostLedger::default(),
        };
        let (records, end) = demand.as_slice().iter().enumerate().try_fold(
            (Vec::with_capacity(demand.len()), start),
            |(mut records, state), (period, &period_demand)| {
                cancel::check(self.cancel.as_ref(), period)?;

                let outcome = review_period(
                    policy,
                    state.stock,
                    period_demand,
                    self.config.shortage_accounting,
                );
                let next = state.advance(&outcome, &self.config.costs);
                tracing::trace!(period, ?outcome, total = next.ledger.total(), "period reviewed");

                records.push(PeriodRecord {
                    period,
                    demand: period_demand,
                    net_stock: outcome.net_stock,
                    stock_after_demand: outcome.closing_stock,
                    order_quantity: outcome.order.unwrap_or(0),
                    shortage_units: outcome.shortage_units,
                    running_holding_cost: next.ledger.holding,
                    running_shortage_cost: next.ledger.shortage,
                    running_ordering_cost: next.ledger.ordering,
                    running_total_cost: next.ledger.total(),
                });
                Ok::<_, SimError>((records, next))
            },
        )?;

        Ok(InventoryResult {
            records,
            holding_cost: end.ledger.holding,
            shortage_cost: end.ledger.shortage,
            ordering_cost: end.ledger.ordering,
            total_demand: demand.total(),
            shortage_accounting: self.config.shortage_accounting,
        })
    }
}

/// Runs `policy` once with the default shortage accounting.
///
/// `initial_stock` of `None` starts the run at the policy's S.
pub fn simulate_inventory<P: ReplenishmentPolicy + ?Sized>(
    policy: &P,
    demand: &DemandSeries,
    costs: CostModel,
    initial_stock: Option<u32>,
) -> Result<InventoryResult, SimError> {
    InventorySimulator::new(InventoryConfig {
        costs,
        initial_stock,
        ..InventoryConfig::default()
    })
    .run(policy, demand)
}
